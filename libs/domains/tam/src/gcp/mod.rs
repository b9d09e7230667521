//! REST clients for the Google APIs behind the health signals, support
//! cases and workspace tools.
//!
//! All clients share one [`GoogleApiClient`] (a pooled `reqwest::Client`
//! plus the bearer token). Without a token every call fails with
//! [`TamError::Upstream`], which the health and report paths turn into a
//! neutral default.

mod monitoring;
mod recommender;
mod security;
mod support;
mod workspace;

pub use monitoring::{CPU_UTILIZATION_METRIC, CPU_UTILIZATION_THRESHOLD, CloudMonitoring};
pub use recommender::{MACHINE_TYPE_RECOMMENDER, Recommender};
pub use security::SecurityCommandCenter;
pub use support::CloudSupport;
pub use workspace::GoogleWorkspace;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::{debug, warn};

use crate::config::GcpConfig;
use crate::error::{TamError, TamResult};

/// Upper bound on followed `nextPageToken`s for one listing.
const MAX_PAGES: usize = 100;

/// Appends each caller-supplied segment to `base` as one percent-encoded
/// path segment. Empty and dot segments are rejected.
pub(crate) fn api_url<S: AsRef<str>>(base: &str, segments: &[S]) -> TamResult<Url> {
    let mut url =
        Url::parse(base).map_err(|e| TamError::Internal(format!("Invalid API base URL {}: {}", base, e)))?;

    if let Some(bad) = segments
        .iter()
        .map(|segment| segment.as_ref())
        .find(|segment| matches!(*segment, "" | "." | ".."))
    {
        return Err(TamError::Validation(format!("invalid resource path segment '{}'", bad)));
    }

    url.path_segments_mut()
        .map_err(|_| TamError::Internal(format!("API base URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Drains a paginated listing. `fetch` receives the previous page's token
/// (`None` for the first page) and returns one page plus the next token;
/// a missing or empty token ends the listing.
pub(crate) async fn collect_pages<T, F, Fut>(source: &'static str, mut fetch: F) -> TamResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = TamResult<(Vec<T>, Option<String>)>>,
{
    let mut items = Vec::new();
    let mut page_token = None;

    for _ in 0..MAX_PAGES {
        let (page, next) = fetch(page_token.take()).await?;
        items.extend(page);
        match next.filter(|token| !token.is_empty()) {
            Some(token) => page_token = Some(token),
            None => return Ok(items),
        }
    }

    warn!(source, pages = MAX_PAGES, items = items.len(), "Stopped following nextPageToken");
    Ok(items)
}

#[derive(Clone)]
pub struct GoogleApiClient {
    http: Client,
    access_token: Option<String>,
}

impl GoogleApiClient {
    pub fn new(config: &GcpConfig) -> TamResult<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| TamError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            access_token: config.access_token.clone(),
        })
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    fn authorized(&self, source: &'static str, request: RequestBuilder) -> TamResult<RequestBuilder> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| TamError::upstream(source, "GCP_ACCESS_TOKEN is not configured"))?;
        Ok(request.bearer_auth(token))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        source: &'static str,
        url: Url,
        query: &[(&str, String)],
    ) -> TamResult<T> {
        debug!(source, url = %url, "GET");
        let request = self.authorized(source, self.http.get(url).query(query))?;
        send(source, request).await?.json().await.map_err(|e| TamError::upstream(source, e))
    }

    pub(crate) async fn get_text(&self, source: &'static str, url: Url, query: &[(&str, String)]) -> TamResult<String> {
        debug!(source, url = %url, "GET");
        let request = self.authorized(source, self.http.get(url).query(query))?;
        send(source, request).await?.text().await.map_err(|e| TamError::upstream(source, e))
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        source: &'static str,
        url: Url,
        body: &serde_json::Value,
    ) -> TamResult<T> {
        debug!(source, url = %url, "POST");
        let request = self.authorized(source, self.http.post(url).json(body))?;
        send(source, request).await?.json().await.map_err(|e| TamError::upstream(source, e))
    }
}

async fn send(source: &'static str, request: RequestBuilder) -> TamResult<reqwest::Response> {
    let response = request.send().await.map_err(|e| TamError::upstream(source, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TamError::upstream(
            source,
            format!("API returned status {}: {}", status, truncate(&body, 256)),
        ));
    }
    Ok(response)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_fails_before_sending() {
        let client = GoogleApiClient::new(&GcpConfig::default()).unwrap();
        assert!(!client.has_token());

        let url = api_url("http://127.0.0.1:9", &["unused"]).unwrap();
        let result: TamResult<serde_json::Value> = client.get_json("monitoring", url, &[]).await;

        match result {
            Err(TamError::Upstream { source_name, reason }) => {
                assert_eq!(source_name, "monitoring");
                assert!(reason.contains("GCP_ACCESS_TOKEN"));
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_api_url_encodes_each_segment() {
        let url = api_url("https://www.googleapis.com/drive/v3", &["files", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "https://www.googleapis.com/drive/v3/files/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_api_url_handles_trailing_slash_base() {
        let url = api_url("https://cloudsupport.googleapis.com/", &["v2", "projects", "acme", "cases"]).unwrap();
        assert_eq!(url.as_str(), "https://cloudsupport.googleapis.com/v2/projects/acme/cases");
    }

    #[test]
    fn test_api_url_rejects_dot_segments() {
        for bad in ["..", ".", ""] {
            let result = api_url("https://www.googleapis.com/drive/v3", &["files", bad]);
            assert!(matches!(result, Err(TamError::Validation(_))), "accepted {:?}", bad);
        }
    }

    #[tokio::test]
    async fn test_collect_pages_follows_tokens() {
        let mut pages = std::collections::VecDeque::from(vec![
            ((1..=10).collect::<Vec<u32>>(), Some("page-2".to_string())),
            (vec![11, 12, 13, 14], Some(String::new())),
        ]);
        let mut tokens = Vec::new();

        let items = collect_pages("cloud_support", |token| {
            tokens.push(token);
            let page = pages.pop_front().unwrap();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 14);
        assert_eq!(items.last(), Some(&14));
        assert_eq!(tokens, vec![None, Some("page-2".to_string())]);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_errors() {
        let mut calls = 0;
        let result: TamResult<Vec<u32>> = collect_pages("cloud_monitoring", |_| {
            calls += 1;
            let page = if calls == 1 {
                Ok((vec![1], Some("next".to_string())))
            } else {
                Err(TamError::upstream("cloud_monitoring", "quota exceeded"))
            };
            async move { page }
        })
        .await;

        assert!(matches!(result, Err(TamError::Upstream { .. })));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_collect_pages_stops_at_page_limit() {
        let mut calls = 0;
        let items = collect_pages("cloud_support", |_| {
            calls += 1;
            async move { Ok((vec![0u8], Some("again".to_string()))) }
        })
        .await
        .unwrap();

        assert_eq!(calls, MAX_PAGES);
        assert_eq!(items.len(), MAX_PAGES);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("ok", 10), "ok");
    }
}
