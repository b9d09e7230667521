use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use super::{GoogleApiClient, api_url};
use crate::error::TamResult;
use crate::sources::FindingsSource;

const SECURITY_CENTER_API: &str = "https://securitycenter.googleapis.com/v1";
const SOURCE: &str = "security_command_center";

/// Security Command Center findings, scoped to one organization.
pub struct SecurityCommandCenter {
    api: GoogleApiClient,
    org_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFindingsResponse {
    #[serde(default)]
    list_findings_results: Vec<serde_json::Value>,
    total_size: Option<u64>,
}

impl SecurityCommandCenter {
    pub fn new(api: GoogleApiClient, org_id: impl Into<String>) -> Self {
        Self {
            api,
            org_id: org_id.into(),
        }
    }
}

fn findings_filter(since: DateTime<Utc>) -> String {
    format!(
        "severity=\"CRITICAL\" AND event_time > \"{}\"",
        since.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

#[async_trait]
impl FindingsSource for SecurityCommandCenter {
    async fn critical_findings_since(&self, since: DateTime<Utc>) -> TamResult<u64> {
        let url = api_url(
            SECURITY_CENTER_API,
            &["organizations", self.org_id.as_str(), "sources", "-", "findings"],
        )?;
        let query = [("filter", findings_filter(since)), ("pageSize", "1000".to_string())];

        let response: ListFindingsResponse = self.api.get_json(SOURCE, url, &query).await?;
        Ok(response
            .total_size
            .unwrap_or(response.list_findings_results.len() as u64))
    }
}
