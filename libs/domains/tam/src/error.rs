use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Result type for TAM operations
pub type TamResult<T> = Result<T, TamError>;

/// Errors that can occur in the TAM domain
#[derive(Debug, Error)]
pub enum TamError {
    /// Quarter label does not match `Q[1-4]-YYYY` or the year is not positive
    #[error("Invalid quarter label '{0}', expected Q1-Q4 followed by a positive year, e.g. Q3-2025")]
    InvalidQuarterLabel(String),

    /// Caller supplied an invalid argument
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Tool name not present in the registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A cloud API could not be reached or answered with an error
    #[error("{source_name} unavailable: {reason}")]
    Upstream {
        source_name: &'static str,
        reason: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TamError {
    pub fn upstream(source_name: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Upstream {
            source_name,
            reason: reason.to_string(),
        }
    }

    /// Client errors map to 400, everything else is a 500.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuarterLabel(_) | Self::Validation(_) | Self::UnknownTool(_)
        )
    }
}

impl From<TamError> for AppError {
    fn from(err: TamError) -> Self {
        match err {
            TamError::InvalidQuarterLabel(_) | TamError::Validation(_) | TamError::UnknownTool(_) => {
                AppError::BadRequest(err.to_string())
            }
            TamError::Upstream { .. } => AppError::Upstream(err.to_string()),
            TamError::Database(e) => AppError::Database(e),
            TamError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for TamError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_client_errors_are_bad_request() {
        let response = TamError::InvalidQuarterLabel("Q5-2025".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = TamError::UnknownTool("launch_rocket".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_errors_are_internal() {
        let response = TamError::upstream("cloud_support", "connection refused").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = TamError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_is_client_error() {
        assert!(TamError::Validation("x".into()).is_client_error());
        assert!(!TamError::Database(sea_orm::DbErr::Custom("x".into())).is_client_error());
    }
}
