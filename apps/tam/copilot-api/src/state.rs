//! Application state management.
//!
//! Clients are built once at startup and injected into the domain services:
//! one pooled HTTP client for every Google API and one PostgreSQL pool for
//! the warehouse.

use domain_tam::gcp::{
    CloudMonitoring, CloudSupport, GoogleApiClient, GoogleWorkspace, Recommender,
    SecurityCommandCenter,
};
use domain_tam::{
    DailyAggregator, HealthEvaluator, PgCostWarehouse, QbrGenerator, SupportCaseManager, TamState,
    agent_definitions, build_registry,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// PostgreSQL database connection pool
    pub db: DatabaseConnection,
    /// Domain services behind the `/api` routes
    pub tam: TamState,
}

impl AppState {
    pub fn new(config: Config, db: DatabaseConnection) -> eyre::Result<Self> {
        let api = GoogleApiClient::new(&config.gcp)?;
        if !api.has_token() {
            warn!("GCP_ACCESS_TOKEN is not set; cloud signals will report unavailable");
        }

        let warehouse = Arc::new(PgCostWarehouse::new(db.clone()));
        let support_source = Arc::new(CloudSupport::new(api.clone(), config.gcp.support_endpoint.clone()));

        let health = Arc::new(HealthEvaluator::new(
            Arc::new(CloudMonitoring::new(api.clone())),
            warehouse.clone(),
            Arc::new(SecurityCommandCenter::new(api.clone(), config.gcp.org_id.clone())),
            Arc::new(Recommender::new(api.clone(), config.gcp.region.clone())),
        ));
        let reports = Arc::new(QbrGenerator::new(warehouse.clone()));
        let support = Arc::new(SupportCaseManager::new(support_source.clone()));
        let aggregator = Arc::new(DailyAggregator::new(
            warehouse,
            support_source,
            config.gcp.customer_account_id.clone(),
        ));

        let tools = build_registry(
            health.clone(),
            support.clone(),
            reports.clone(),
            Arc::new(GoogleWorkspace::new(api)),
        );
        let agents = agent_definitions();
        info!(tools = tools.names().len(), agents = agents.len(), "Tool registry ready");

        Ok(Self {
            config,
            db,
            tam: TamState {
                health,
                reports,
                support,
                aggregator,
                tools: Arc::new(tools),
                agents: Arc::new(agents),
            },
        })
    }
}
