use crate::errors::AppError;
use crate::models::{
    DisableAiResponse, ErrorBody, HealthResponse, PhoneRequest, StatusResponse,
};
use crate::services::LeadLookupService;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Phone lookup and AI toggle over the configured datastore.
    pub leads: LeadLookupService,
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            message: "Servidor funcionando".to_string(),
        }),
    )
}

/// POST /api/desativar-ia
///
/// Switches the AI assistant off for the lead stored under the given phone.
/// Calling it on a lead that is already `OFF` succeeds without writing.
#[utoipa::path(
    post,
    path = "/api/desativar-ia",
    request_body = PhoneRequest,
    responses(
        (status = 200, description = "AI disabled (or already disabled)", body = DisableAiResponse),
        (status = 400, description = "Phone missing or body malformed", body = ErrorBody),
        (status = 404, description = "No lead under any phone candidate", body = ErrorBody),
        (status = 500, description = "Datastore read or update failed", body = ErrorBody)
    )
)]
pub async fn disable_ai(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PhoneRequest>, JsonRejection>,
) -> Result<Json<DisableAiResponse>, AppError> {
    let Json(request) = payload?;
    let phone = request.phone()?;
    tracing::info!("POST /api/desativar-ia - telefone: {:?}", phone);

    let outcome = state.leads.disable_ai(phone.as_deref()).await?;

    Ok(Json(DisableAiResponse {
        success: true,
        message: outcome.message.to_string(),
        ia_on_off_anterior: outcome.previous_status,
        lead: outcome.lead,
    }))
}

/// POST /api/verificar-status
///
/// Reports the stored name, phone and AI status of a lead. Never writes.
#[utoipa::path(
    post,
    path = "/api/verificar-status",
    request_body = PhoneRequest,
    responses(
        (status = 200, description = "Current lead status", body = StatusResponse),
        (status = 400, description = "Phone missing or body malformed", body = ErrorBody),
        (status = 404, description = "No lead under any phone candidate", body = ErrorBody),
        (status = 500, description = "Datastore read failed", body = ErrorBody)
    )
)]
pub async fn verify_status(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PhoneRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Json(request) = payload?;
    let phone = request.phone()?;
    tracing::info!("POST /api/verificar-status - telefone: {:?}", phone);

    let lead = state.leads.get_status(phone.as_deref()).await?;

    Ok(Json(StatusResponse {
        success: true,
        lead,
    }))
}
