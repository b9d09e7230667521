use std::sync::Arc;
use tracing::info;

use crate::error::{TamError, TamResult};
use crate::models::SupportCasesResponse;
use crate::sources::SupportCaseSource;

/// Cases returned in a summary; the counts cover all open cases.
pub const MAX_LISTED_CASES: usize = 10;

pub struct SupportCaseManager {
    source: Arc<dyn SupportCaseSource>,
}

impl SupportCaseManager {
    pub fn new(source: Arc<dyn SupportCaseSource>) -> Self {
        Self { source }
    }

    /// Upstream failures propagate since there is no neutral case list.
    pub async fn open_cases_summary(&self, customer_account_id: &str) -> TamResult<SupportCasesResponse> {
        let customer_account_id = customer_account_id.trim();
        if customer_account_id.is_empty() {
            return Err(TamError::Validation("customer_account_id is required".to_string()));
        }

        let cases = self.source.open_cases(customer_account_id).await?;

        let total_open_cases = cases.len() as u64;
        let p1_cases = cases.iter().filter(|c| c.is_p1()).count() as u64;
        info!(customer_account_id, total_open_cases, p1_cases, "Fetched open support cases");

        Ok(SupportCasesResponse {
            total_open_cases,
            p1_cases,
            cases: cases.into_iter().take(MAX_LISTED_CASES).collect(),
        })
    }
}
