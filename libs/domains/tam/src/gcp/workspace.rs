use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{GoogleApiClient, api_url};
use crate::error::TamResult;
use crate::sources::WorkspaceClient;
use crate::workspace::{DriveDocument, DriveFile, encode_raw_message};

const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";
const GMAIL_API: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Drive v3 and Gmail v1 on behalf of the token's user.
pub struct GoogleWorkspace {
    api: GoogleApiClient,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct FileMetadata {
    name: String,
}

impl GoogleWorkspace {
    pub fn new(api: GoogleApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl WorkspaceClient for GoogleWorkspace {
    async fn list_drive_files(&self, page_size: u32) -> TamResult<Vec<DriveFile>> {
        let query = [
            ("pageSize", page_size.to_string()),
            ("fields", "nextPageToken, files(id, name)".to_string()),
        ];
        let list: FileList = self
            .api
            .get_json("drive", api_url(DRIVE_API, &["files"])?, &query)
            .await?;
        Ok(list.files)
    }

    async fn read_drive_file(&self, file_id: &str) -> TamResult<DriveDocument> {
        let url = api_url(DRIVE_API, &["files", file_id])?;
        let metadata: FileMetadata = self
            .api
            .get_json("drive", url.clone(), &[("fields", "name".to_string())])
            .await?;
        let content = self
            .api
            .get_text("drive", url, &[("alt", "media".to_string())])
            .await?;

        Ok(DriveDocument {
            name: metadata.name,
            content,
        })
    }

    async fn read_gmail_message(&self, message_id: &str) -> TamResult<serde_json::Value> {
        let url = api_url(GMAIL_API, &["messages", message_id])?;
        self.api
            .get_json("gmail", url, &[("format", "full".to_string())])
            .await
    }

    async fn send_gmail_message(
        &self,
        to: &str,
        subject: &str,
        message_text: &str,
    ) -> TamResult<serde_json::Value> {
        let body = json!({ "raw": encode_raw_message(to, subject, message_text) });
        let sent: serde_json::Value = self
            .api
            .post_json("gmail", api_url(GMAIL_API, &["messages", "send"])?, &body)
            .await?;
        tracing::info!(to, message_id = ?sent.get("id"), "Sent Gmail message");
        Ok(sent)
    }
}
