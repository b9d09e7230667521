//! Drive and Gmail tools for the email-drafting assistant.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use validator::Validate;

use super::tools::{TamTool, ToolName, parse_args, to_output};
use crate::error::TamResult;
use crate::models::validate_resource_id;
use crate::sources::WorkspaceClient;

pub const DEFAULT_DRIVE_PAGE_SIZE: u32 = 10;

fn default_page_size() -> u32 {
    DEFAULT_DRIVE_PAGE_SIZE
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListDriveFilesInput {
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 1000))]
    pub number_of_files: u32,
}

pub struct ListDriveFilesTool {
    client: Arc<dyn WorkspaceClient>,
}

impl ListDriveFilesTool {
    pub fn new(client: Arc<dyn WorkspaceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TamTool for ListDriveFilesTool {
    fn name(&self) -> ToolName {
        ToolName::ListDriveFiles
    }

    fn description(&self) -> &'static str {
        "List files from Google Drive"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "number_of_files": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 1000,
                    "default": DEFAULT_DRIVE_PAGE_SIZE
                }
            }
        })
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: ListDriveFilesInput = parse_args(self.name(), arguments)?;
        let files = self.client.list_drive_files(input.number_of_files).await?;
        to_output(&files)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReadDriveFileInput {
    #[validate(length(min = 1, max = 256), custom(function = "validate_resource_id"))]
    pub file_id: String,
}

pub struct ReadDriveFileTool {
    client: Arc<dyn WorkspaceClient>,
}

impl ReadDriveFileTool {
    pub fn new(client: Arc<dyn WorkspaceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TamTool for ReadDriveFileTool {
    fn name(&self) -> ToolName {
        ToolName::ReadDriveFile
    }

    fn description(&self) -> &'static str {
        "Read a file from Google Drive"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "file_id": { "type": "string" } },
            "required": ["file_id"]
        })
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: ReadDriveFileInput = parse_args(self.name(), arguments)?;
        let document = self.client.read_drive_file(&input.file_id).await?;
        to_output(&document)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReadGmailMessageInput {
    #[validate(length(min = 1, max = 256), custom(function = "validate_resource_id"))]
    pub message_id: String,
}

pub struct ReadGmailMessageTool {
    client: Arc<dyn WorkspaceClient>,
}

impl ReadGmailMessageTool {
    pub fn new(client: Arc<dyn WorkspaceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TamTool for ReadGmailMessageTool {
    fn name(&self) -> ToolName {
        ToolName::ReadGmailMessage
    }

    fn description(&self) -> &'static str {
        "Read a message from Gmail"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "message_id": { "type": "string" } },
            "required": ["message_id"]
        })
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: ReadGmailMessageInput = parse_args(self.name(), arguments)?;
        let message = self.client.read_gmail_message(&input.message_id).await?;
        to_output(&message)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendGmailMessageInput {
    #[validate(email)]
    pub to: String,
    #[validate(length(min = 1, max = 998))]
    pub subject: String,
    pub message_text: String,
}

pub struct SendGmailMessageTool {
    client: Arc<dyn WorkspaceClient>,
}

impl SendGmailMessageTool {
    pub fn new(client: Arc<dyn WorkspaceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TamTool for SendGmailMessageTool {
    fn name(&self) -> ToolName {
        ToolName::SendGmailMessage
    }

    fn description(&self) -> &'static str {
        "Send a message from Gmail"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "to": { "type": "string", "format": "email" },
                "subject": { "type": "string" },
                "message_text": { "type": "string" }
            },
            "required": ["to", "subject", "message_text"]
        })
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: SendGmailMessageInput = parse_args(self.name(), arguments)?;
        let sent = self
            .client
            .send_gmail_message(&input.to, &input.subject, &input.message_text)
            .await?;
        to_output(&sent)
    }
}
