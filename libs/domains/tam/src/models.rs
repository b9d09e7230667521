use chrono::{DateTime, Days, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{TamError, TamResult};

/// GCP project ids, optionally domain-scoped (`example.com:project`)
static PROJECT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.:-]*$").unwrap());

/// Opaque Drive file and Gmail message ids
static RESOURCE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

pub(crate) fn validate_project_id(project_id: &str) -> Result<(), validator::ValidationError> {
    if !PROJECT_ID_PATTERN.is_match(project_id) {
        return Err(validator::ValidationError::new("invalid_project_id"));
    }
    Ok(())
}

pub(crate) fn validate_resource_id(id: &str) -> Result<(), validator::ValidationError> {
    if !RESOURCE_ID_PATTERN.is_match(id) {
        return Err(validator::ValidationError::new("invalid_resource_id"));
    }
    Ok(())
}

pub const DEFAULT_TIME_PERIOD_DAYS: u32 = 7;

fn default_time_period_days() -> u32 {
    DEFAULT_TIME_PERIOD_DAYS
}

// =============================================================================
// Time windows and warehouse rows
// =============================================================================

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> TamResult<Self> {
        if start > end {
            return Err(TamError::Validation(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days` calendar days ending on (and including) `end`.
    pub fn trailing_days(end: NaiveDate, days: u32) -> TamResult<Self> {
        let span = days.saturating_sub(1);
        let start = end
            .checked_sub_days(Days::new(u64::from(span)))
            .ok_or_else(|| TamError::Validation(format!("{} days before {} is out of range", span, end)))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Midnight UTC at the window start.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}

/// One cost row fetched from the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub service_name: String,
    pub cost: f64,
    pub usage_date: NaiveDate,
    pub usage_amount: f64,
}

/// A row of the daily cost and usage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRow {
    pub project_id: String,
    pub usage_date: NaiveDate,
    pub service_name: String,
    pub cost: f64,
    pub usage_amount: f64,
}

impl From<&UsageRow> for CostRow {
    fn from(row: &UsageRow) -> Self {
        Self {
            service_name: row.service_name.clone(),
            cost: row.cost,
            usage_date: row.usage_date,
            usage_amount: row.usage_amount,
        }
    }
}

/// Cost summed per service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceCost {
    pub service_name: String,
    pub cost: f64,
}

/// Totals for one day of the daily cost and usage table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub rows: u64,
    pub projects: u64,
    pub services: u64,
    pub total_cost: f64,
    pub total_usage_amount: f64,
}

// =============================================================================
// Platform health
// =============================================================================

/// Tri-state performance verdict
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum HealthStatus {
    #[default]
    #[serde(rename = "OK")]
    #[strum(serialize = "OK")]
    Ok,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthSummary {
    pub performance_status: HealthStatus,
    /// Signed percentage change between the first and last day of the window
    pub cost_trend_percent: f64,
    pub new_critical_findings: u64,
    pub optimization_recommendations: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlatformHealthResponse {
    pub project_id: String,
    pub health_summary: HealthSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PlatformHealthRequest {
    #[validate(length(min = 1, max = 128), custom(function = "validate_project_id"))]
    #[schema(example = "tam-copilot-project")]
    pub project_id: String,

    /// Days to look back, including today
    #[serde(default = "default_time_period_days")]
    #[validate(range(min = 1, max = 90))]
    #[schema(default = 7, minimum = 1, maximum = 90)]
    pub time_period_days: u32,
}

// =============================================================================
// Support cases
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupportCase {
    /// Last segment of the upstream resource name
    pub case_id: String,
    pub title: String,
    pub priority: String,
    pub last_update: Option<String>,
}

impl SupportCase {
    pub fn is_p1(&self) -> bool {
        self.priority.eq_ignore_ascii_case("P1")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SupportCasesRequest {
    #[validate(length(min = 1, max = 256))]
    #[schema(example = "organizations/123456789")]
    pub customer_account_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupportCasesResponse {
    pub total_open_cases: u64,
    pub p1_cases: u64,
    pub cases: Vec<SupportCase>,
}

// =============================================================================
// Quarterly business review
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct QbrRequest {
    #[validate(length(min = 1, max = 128), custom(function = "validate_project_id"))]
    pub project_id: String,

    /// Quarter label such as `Q3-2025`; defaults to the current quarter
    #[schema(example = "Q3-2025")]
    pub quarter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuarterlyReport {
    pub project_id: String,
    pub quarter_label: String,
    pub total_cost: f64,
    /// Change against the preceding quarter
    pub cost_trend_percent: f64,
    pub top_services: Vec<ServiceCost>,
    pub recommendations: Vec<String>,
    pub usage_highlights: BTreeMap<String, f64>,
}

// =============================================================================
// Daily aggregation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AggregationResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub usage_date: NaiveDate,
    pub rows_aggregated: u64,
    pub support_snapshot_rows: u64,
}

// =============================================================================
// Agents and tools
// =============================================================================

/// Declarative bundle of a system prompt and the tools it may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AgentDefinition {
    pub name: String,
    pub model: String,
    pub description: String,
    pub instruction: String,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool arguments
    #[schema(value_type = Object)]
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToolInvocationResponse {
    pub tool: String,
    pub output: String,
}
