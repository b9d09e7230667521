//! Counters for the reporting pipeline.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Whether an upstream signal produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Available,
    Unavailable,
}

impl SignalOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

pub struct ReportingMetrics;

impl ReportingMetrics {
    pub fn record_signal(signal: &'static str, outcome: SignalOutcome) {
        counter!(
            "tam_signal_fetches_total",
            "signal" => signal,
            "outcome" => outcome.as_str()
        )
        .increment(1);
    }

    pub fn record_report_generated(quarter: &str) {
        counter!("tam_reports_generated_total", "quarter" => quarter.to_string()).increment(1);
    }

    pub fn record_tool_invocation(tool: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        counter!(
            "tam_tool_invocations_total",
            "tool" => tool.to_string(),
            "status" => status
        )
        .increment(1);
    }

    pub fn record_aggregation(success: bool, rows: u64, elapsed: Duration) {
        let status = if success { "success" } else { "error" };
        counter!("tam_aggregation_runs_total", "status" => status).increment(1);
        histogram!("tam_aggregation_duration_seconds").record(elapsed.as_secs_f64());
        if success {
            gauge!("tam_aggregation_rows_last_run").set(rows as f64);
        }

        tracing::debug!(status, rows, elapsed_ms = elapsed.as_millis() as u64, "Recorded aggregation run");
    }
}
