//! HTTP handlers for the TAM Co-Pilot API

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse},
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::agent::ToolRegistry;
use crate::error::{TamError, TamResult};
use crate::health::HealthEvaluator;
use crate::ingestion::DailyAggregator;
use crate::models::{
    AgentDefinition, AggregationResponse, HealthStatus, HealthSummary, PlatformHealthRequest,
    PlatformHealthResponse, QbrRequest, QuarterlyReport, ServiceCost, SupportCase,
    SupportCasesRequest, SupportCasesResponse, ToolDescriptor, ToolInvocationResponse,
};
use crate::report::QbrGenerator;
use crate::support::SupportCaseManager;

/// Shared state for handlers
#[derive(Clone)]
pub struct TamState {
    pub health: Arc<HealthEvaluator>,
    pub reports: Arc<QbrGenerator>,
    pub support: Arc<SupportCaseManager>,
    pub aggregator: Arc<DailyAggregator>,
    pub tools: Arc<ToolRegistry>,
    pub agents: Arc<Vec<AgentDefinition>>,
}

/// OpenAPI documentation for the TAM API
#[derive(OpenApi)]
#[openapi(
    paths(
        platform_health,
        support_cases,
        qbr_data,
        daily_aggregation,
        list_agents,
        list_tools,
        invoke_tool,
    ),
    components(
        schemas(
            PlatformHealthRequest,
            PlatformHealthResponse,
            HealthSummary,
            HealthStatus,
            SupportCasesRequest,
            SupportCasesResponse,
            SupportCase,
            QbrRequest,
            QuarterlyReport,
            ServiceCost,
            AggregationResponse,
            AgentDefinition,
            ToolDescriptor,
            ToolInvocationResponse,
        ),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "tam-copilot", description = "Platform health, support cases and QBR data"),
        (name = "tam-ingestion", description = "Daily cost and usage aggregation"),
        (name = "tam-agents", description = "Agent definitions and tool invocation")
    )
)]
pub struct ApiDoc;

/// Create the TAM router with all HTTP endpoints
pub fn router(state: TamState) -> Router {
    Router::new()
        .route("/platform-health", post(platform_health))
        .route("/support-cases", post(support_cases))
        .route("/qbr-data", post(qbr_data))
        .route("/daily-aggregation", post(daily_aggregation))
        .route("/agents", get(list_agents))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(invoke_tool))
        .with_state(state)
}

// =============================================================================
// Co-Pilot endpoints
// =============================================================================

/// Summarize performance, cost trend, security findings and recommendations
#[utoipa::path(
    post,
    path = "/platform-health",
    tag = "tam-copilot",
    request_body = PlatformHealthRequest,
    responses(
        (status = 200, description = "Health summary", body = PlatformHealthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn platform_health(
    State(state): State<TamState>,
    ValidatedJson(request): ValidatedJson<PlatformHealthRequest>,
) -> TamResult<Json<PlatformHealthResponse>> {
    let response = state
        .health
        .evaluate(&request.project_id, request.time_period_days)
        .await?;
    Ok(Json(response))
}

/// List open support cases for a customer account
#[utoipa::path(
    post,
    path = "/support-cases",
    tag = "tam-copilot",
    request_body = SupportCasesRequest,
    responses(
        (status = 200, description = "Open cases, at most 10 listed", body = SupportCasesResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn support_cases(
    State(state): State<TamState>,
    ValidatedJson(request): ValidatedJson<SupportCasesRequest>,
) -> TamResult<Json<SupportCasesResponse>> {
    let summary = state
        .support
        .open_cases_summary(&request.customer_account_id)
        .await?;
    Ok(Json(summary))
}

/// Build quarterly business review data
#[utoipa::path(
    post,
    path = "/qbr-data",
    tag = "tam-copilot",
    request_body = QbrRequest,
    responses(
        (status = 200, description = "Quarterly report", body = QuarterlyReport),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn qbr_data(
    State(state): State<TamState>,
    ValidatedJson(request): ValidatedJson<QbrRequest>,
) -> TamResult<Json<QuarterlyReport>> {
    let report = state
        .reports
        .generate(&request.project_id, request.quarter.as_deref())
        .await?;
    Ok(Json(report))
}

// =============================================================================
// Ingestion
// =============================================================================

/// Aggregate yesterday's billing export and snapshot open support cases
#[utoipa::path(
    post,
    path = "/daily-aggregation",
    tag = "tam-ingestion",
    responses(
        (status = 200, description = "Aggregation finished", body = AggregationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn daily_aggregation(State(state): State<TamState>) -> TamResult<Json<AggregationResponse>> {
    let response = state.aggregator.run().await?;
    Ok(Json(response))
}

// =============================================================================
// Agents and tools
// =============================================================================

/// List agent definitions
#[utoipa::path(
    get,
    path = "/agents",
    tag = "tam-agents",
    responses((status = 200, description = "Agent definitions", body = Vec<AgentDefinition>))
)]
async fn list_agents(State(state): State<TamState>) -> Json<Vec<AgentDefinition>> {
    Json(state.agents.as_ref().clone())
}

/// List tool declarations
#[utoipa::path(
    get,
    path = "/tools",
    tag = "tam-agents",
    responses((status = 200, description = "Tool declarations", body = Vec<ToolDescriptor>))
)]
async fn list_tools(State(state): State<TamState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.tools.list())
}

/// Invoke a tool by name. An empty body counts as no arguments.
#[utoipa::path(
    post,
    path = "/tools/{name}",
    tag = "tam-agents",
    params(("name" = String, Path, description = "Tool name, e.g. get_platform_health")),
    request_body(content = Object, description = "Tool arguments"),
    responses(
        (status = 200, description = "Tool output", body = ToolInvocationResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn invoke_tool(
    State(state): State<TamState>,
    Path(name): Path<String>,
    body: Bytes,
) -> TamResult<Json<ToolInvocationResponse>> {
    let arguments = parse_arguments(&body)?;
    let output = state.tools.execute(&name, arguments).await?;
    Ok(Json(ToolInvocationResponse { tool: name, output }))
}

fn parse_arguments(body: &[u8]) -> TamResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| TamError::Validation(format!("malformed arguments: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_null_arguments() {
        assert_eq!(parse_arguments(b"").unwrap(), Value::Null);
        assert_eq!(parse_arguments(b"  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_arguments_are_parsed() {
        assert_eq!(parse_arguments(br#"{"query":"x"}"#).unwrap(), json!({"query": "x"}));
        assert!(matches!(parse_arguments(b"{not json"), Err(TamError::Validation(_))));
    }
}
