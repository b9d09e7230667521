//! TAM Co-Pilot Domain
//!
//! Usage, cost and account reporting for Technical Account Managers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    Handlers     │  ← /api routes, tool invocation
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │    Services     │  ← health, QBR, support cases, daily aggregation
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │     Sources     │  ← collaborator traits (GCP APIs, PostgreSQL warehouse)
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │     Models      │  ← requests, responses, quarters, time windows
//! └─────────────────┘
//! ```
//!
//! Every signal a service reads is wrapped in a [`Signal`]: an unavailable
//! source degrades to a neutral value instead of failing the request.

pub mod agent;
pub mod aggregation;
pub mod config;
pub mod error;
pub mod gcp;
pub mod handlers;
pub mod health;
pub mod ingestion;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod models;
pub mod postgres;
pub mod quarter;
pub mod report;
pub mod signal;
pub mod sources;
pub mod support;
pub mod workspace;

// Re-export commonly used types
pub use config::GcpConfig;
pub use error::{TamError, TamResult};
pub use models::{
    AgentDefinition, AggregationResponse, HealthStatus, HealthSummary, PlatformHealthRequest,
    PlatformHealthResponse, QbrRequest, QuarterlyReport, SupportCase, SupportCasesRequest,
    SupportCasesResponse, TimeWindow,
};
pub use quarter::Quarter;
pub use signal::Signal;

pub use health::HealthEvaluator;
pub use ingestion::DailyAggregator;
pub use report::QbrGenerator;
pub use support::SupportCaseManager;

pub use postgres::PgCostWarehouse;
pub use sources::{
    CostWarehouse, FindingsSource, MetricsSource, RecommendationSource, SupportCaseSource,
    UsageLedger, WorkspaceClient,
};

pub use agent::{TamTool, ToolName, ToolRegistry, agent_definitions, build_registry};

pub use handlers::{ApiDoc, TamState};
