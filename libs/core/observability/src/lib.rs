//! Metrics for the TAM Co-Pilot services.
//!
//! - Prometheus recorder and `/metrics` handler
//! - [`ReportingMetrics`] for signal, report, tool and aggregation outcomes
//! - [`middleware::metrics_middleware`] for per-route request metrics
//!
//! ```rust,ignore
//! observability::init_metrics()?;
//! let app = Router::new()
//!     .route("/metrics", get(observability::metrics_handler))
//!     .layer(axum::middleware::from_fn(observability::middleware::metrics_middleware));
//! ```

pub mod middleware;
pub mod reporting;

pub use reporting::{ReportingMetrics, SignalOutcome};

pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the global Prometheus recorder. Later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for `/metrics`
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP responses with a 4xx or 5xx status"
    );

    describe_counter!(
        "tam_signal_fetches_total",
        "Upstream signal fetches by signal and outcome"
    );
    describe_counter!("tam_reports_generated_total", "Quarterly reports generated");
    describe_counter!(
        "tam_tool_invocations_total",
        "Agent tool invocations by tool and status"
    );
    describe_counter!(
        "tam_aggregation_runs_total",
        "Daily aggregation runs by status"
    );
    describe_histogram!(
        "tam_aggregation_duration_seconds",
        "Daily aggregation duration in seconds"
    );
    describe_gauge!(
        "tam_aggregation_rows_last_run",
        "Rows written by the last aggregation run"
    );
}
