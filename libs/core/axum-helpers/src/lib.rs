//! # Axum Helpers
//!
//! Shared HTTP plumbing for the TAM services.
//!
//! - [`server`]: router assembly with OpenAPI docs, health endpoints, graceful shutdown
//! - [`http`]: security header middleware
//! - [`errors`]: [`AppError`] and the JSON error body
//! - [`extractors`]: [`ValidatedJson`]

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, close_postgres, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::security_headers;

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::ValidatedJson;
