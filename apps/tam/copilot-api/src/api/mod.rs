use axum::{Router, middleware, routing::get};

pub mod health;

use crate::state::AppState;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &AppState) -> Router {
    domain_tam::handlers::router(state.tam.clone())
}

/// Creates a router with the /ready endpoint that checks the database.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Prometheus scrape endpoint at `/metrics`.
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(observability::metrics_handler))
}

/// Merges docs, `/api`, liveness, readiness and metrics into one app with
/// request metrics on every route.
pub fn app(state: &AppState) -> std::io::Result<Router> {
    let router = axum_helpers::create_router::<crate::openapi::ApiDoc>(
        routes(state),
        &state.config.cors_allowed_origin,
    )?;

    Ok(router
        .merge(axum_helpers::health_router(state.config.app))
        .merge(ready_router(state.clone()))
        .merge(metrics_router())
        .layer(middleware::from_fn(
            observability::middleware::metrics_middleware,
        )))
}
