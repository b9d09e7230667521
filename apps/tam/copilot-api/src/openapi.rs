use utoipa::OpenApi;

/// Root API documentation; domain paths are mounted under `/api`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TAM Co-Pilot API",
        description = "Platform health, support cases, QBR data and agent tools for Technical Account Managers"
    ),
    nest(
        (path = "/api", api = domain_tam::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
