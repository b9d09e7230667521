//! Per-signal results for best-effort reports.

use observability::reporting::{ReportingMetrics, SignalOutcome};
use tracing::warn;

use crate::error::TamResult;

/// Outcome of fetching one upstream input.
///
/// Reports combine several independent inputs. An unavailable input is
/// replaced by a neutral value instead of failing the whole report.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal<T> {
    Available(T),
    Unavailable { source: &'static str, reason: String },
}

impl<T> Signal<T> {
    /// Wraps a fetch result, logging and counting failures.
    pub fn observe(source: &'static str, result: TamResult<T>) -> Self {
        match result {
            Ok(value) => {
                ReportingMetrics::record_signal(source, SignalOutcome::Available);
                Signal::Available(value)
            }
            Err(e) => {
                warn!(signal = source, error = %e, "Signal unavailable, using neutral default");
                ReportingMetrics::record_signal(source, SignalOutcome::Unavailable);
                Signal::Unavailable {
                    source,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Signal::Available(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Signal<U> {
        match self {
            Signal::Available(value) => Signal::Available(f(value)),
            Signal::Unavailable { source, reason } => Signal::Unavailable { source, reason },
        }
    }

    pub fn unwrap_or(self, neutral: T) -> T {
        match self {
            Signal::Available(value) => value,
            Signal::Unavailable { .. } => neutral,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Signal::Available(value) => Some(value),
            Signal::Unavailable { .. } => None,
        }
    }
}

impl<T: Default> Signal<T> {
    pub fn unwrap_or_neutral(self) -> T {
        self.unwrap_or(T::default())
    }
}
