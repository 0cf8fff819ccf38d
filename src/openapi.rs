use crate::handlers;
use crate::models::{
    DisableAiResponse, ErrorBody, HealthResponse, LeadStatus, PhoneRequest, StatusResponse,
};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::disable_ai, handlers::verify_status),
    components(schemas(
        PhoneRequest,
        DisableAiResponse,
        StatusResponse,
        LeadStatus,
        ErrorBody,
        HealthResponse
    )),
    info(
        title = "Lead IA Toggle API",
        description = "Look up leads by phone and switch their AI assistant off"
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
