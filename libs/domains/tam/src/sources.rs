//! Collaborator seams.
//!
//! Services receive these as constructor dependencies. Production wires the
//! PostgreSQL warehouse and the Google API clients, tests wire mocks or the
//! in-memory implementations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::TamResult;
use crate::models::{CostRow, SupportCase, TimeWindow, UsageSummary};
use crate::workspace::{DriveDocument, DriveFile};

/// Read side of the cost and usage warehouse.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CostWarehouse: Send + Sync {
    /// Rows for a project whose usage date falls inside `window`, oldest first.
    async fn cost_rows(&self, project_id: &str, window: TimeWindow) -> TamResult<Vec<CostRow>>;
}

/// Write side used by the daily aggregation job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Rolls the billing export for `day` into the daily table. Returns rows written.
    async fn aggregate_daily_usage(&self, day: NaiveDate) -> TamResult<u64>;

    /// Stores the cases as they stand on `day`. Returns rows written.
    async fn record_support_snapshot(
        &self,
        customer_account_id: &str,
        day: NaiveDate,
        cases: &[SupportCase],
    ) -> TamResult<u64>;

    async fn usage_summary(&self, day: NaiveDate) -> TamResult<UsageSummary>;
}

/// Performance samples above the utilization threshold.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn over_threshold_samples(&self, project_id: &str, window: TimeWindow) -> TamResult<u64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FindingsSource: Send + Sync {
    /// Critical security findings with an event time after `since`.
    async fn critical_findings_since(&self, since: DateTime<Utc>) -> TamResult<u64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Descriptions of open optimization recommendations for a project.
    async fn recommendations(&self, project_id: &str) -> TamResult<Vec<String>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupportCaseSource: Send + Sync {
    async fn open_cases(&self, customer_account_id: &str) -> TamResult<Vec<SupportCase>>;
}

/// Drive and Gmail access for the assistant tools.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceClient: Send + Sync {
    async fn list_drive_files(&self, page_size: u32) -> TamResult<Vec<DriveFile>>;

    async fn read_drive_file(&self, file_id: &str) -> TamResult<DriveDocument>;

    async fn read_gmail_message(&self, message_id: &str) -> TamResult<serde_json::Value>;

    async fn send_gmail_message(
        &self,
        to: &str,
        subject: &str,
        message_text: &str,
    ) -> TamResult<serde_json::Value>;
}
