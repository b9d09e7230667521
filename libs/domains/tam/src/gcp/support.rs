use async_trait::async_trait;
use serde::Deserialize;

use super::{GoogleApiClient, api_url, collect_pages};
use crate::error::TamResult;
use crate::models::SupportCase;
use crate::sources::SupportCaseSource;

const SOURCE: &str = "cloud_support";
/// Maximum page size accepted by `cases.list`.
const PAGE_SIZE: u32 = 100;

/// Cloud Support API v2 case listing.
pub struct CloudSupport {
    api: GoogleApiClient,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCasesResponse {
    #[serde(default)]
    cases: Vec<CaseEntry>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaseEntry {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    priority: String,
    update_time: Option<String>,
}

impl From<CaseEntry> for SupportCase {
    fn from(entry: CaseEntry) -> Self {
        let case_id = entry
            .name
            .rsplit('/')
            .next()
            .unwrap_or(entry.name.as_str())
            .to_string();
        Self {
            case_id,
            title: entry.display_name,
            priority: entry.priority,
            last_update: entry.update_time,
        }
    }
}

impl CloudSupport {
    pub fn new(api: GoogleApiClient, endpoint: impl Into<String>) -> Self {
        Self {
            api,
            endpoint: endpoint.into(),
        }
    }
}

/// Path segments of the case collection. Bare ids are treated as
/// projects; full resource names are split on `/`.
fn cases_path(customer_account_id: &str) -> Vec<&str> {
    let id = customer_account_id.trim_matches('/');
    let mut segments = vec!["v2"];
    if id.contains('/') {
        segments.extend(id.split('/'));
    } else {
        segments.extend(["projects", id]);
    }
    segments.push("cases");
    segments
}

#[async_trait]
impl SupportCaseSource for CloudSupport {
    async fn open_cases(&self, customer_account_id: &str) -> TamResult<Vec<SupportCase>> {
        let url = api_url(&self.endpoint, &cases_path(customer_account_id))?;
        let api = &self.api;

        let entries = collect_pages(SOURCE, |page_token| {
            let url = url.clone();
            let mut query = vec![
                ("filter", "state=OPEN".to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
            ];
            if let Some(token) = page_token {
                query.push(("pageToken", token));
            }
            async move {
                let page: ListCasesResponse = api.get_json(SOURCE, url, &query).await?;
                Ok((page.cases, page.next_page_token))
            }
        })
        .await?;

        Ok(entries.into_iter().map(SupportCase::from).collect())
    }
}
