use crate::models::ErrorBody;
use axum::{
    extract::rejection::JsonRejection,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Message for a failed datastore read.
pub const MSG_DATASTORE_READ: &str = "Erro no banco";
/// Message for a failed datastore update.
pub const MSG_DATASTORE_UPDATE: &str = "Erro ao atualizar";
/// Message shown for unclassified failures.
pub const MSG_INTERNAL: &str = "Erro interno";

/// Application-specific error types.
///
/// Every variant is rendered as `{"success": false, "message": ...}` with an
/// optional `error` field carrying machine detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Missing or malformed input (400).
    Validation(String),
    /// No stored lead matched any phone candidate (404).
    NotFound(String),
    /// Read or write failure at the datastore boundary (500, detail exposed).
    Datastore {
        /// Human readable message returned to the operator.
        message: String,
        /// Underlying transport or query error.
        detail: String,
    },
    /// Anything else (500, detail only logged).
    Internal(String),
}

impl AppError {
    /// Builds a datastore error with the default read message.
    pub fn datastore(detail: impl Into<String>) -> Self {
        AppError::Datastore {
            message: MSG_DATASTORE_READ.to_string(),
            detail: detail.into(),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Datastore { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Datastore { message, detail } => {
                write!(f, "Datastore error: {} ({})", message, detail)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each variant to its status code and JSON body, logging by severity.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Validation(msg) => {
                tracing::info!("Rejected request: {}", msg);
                ErrorBody::new(msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!("Lookup miss: {}", msg);
                ErrorBody::new(msg, None)
            }
            AppError::Datastore { message, detail } => {
                tracing::error!("Datastore error: {} -> {}", message, detail);
                ErrorBody::new(message, Some(detail))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorBody::new(MSG_INTERNAL.to_string(), None)
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::datastore(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::datastore(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    }
}

/// Message for bodies rejected by the size limit.
pub const MSG_BODY_TOO_LARGE: &str = "Corpo da requisição muito grande";
/// Message for requests rejected by the rate limiter.
pub const MSG_TOO_MANY_REQUESTS: &str = "Muitas requisições, tente novamente em instantes";

/// Rewrites plain-text error responses produced by middleware (body limit,
/// rate limiter, method routing) into the `ErrorBody` JSON shape.
///
/// Status and headers such as `retry-after` are kept. Responses that are
/// already JSON pass through untouched.
pub async fn json_error_responses(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.starts_with("application/json"));
    if is_json {
        return response;
    }

    let message = match status {
        StatusCode::PAYLOAD_TOO_LARGE => MSG_BODY_TOO_LARGE.to_string(),
        StatusCode::TOO_MANY_REQUESTS => MSG_TOO_MANY_REQUESTS.to_string(),
        s if s.is_server_error() => MSG_INTERNAL.to_string(),
        s => s.canonical_reason().unwrap_or("Erro").to_string(),
    };
    tracing::warn!("Request rejected by middleware: {}", status);

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_TYPE);
    parts.headers.remove(CONTENT_LENGTH);

    (parts, Json(ErrorBody::new(message, None))).into_response()
}

/// Extension trait for relabelling datastore errors.
/// Similar to `anyhow::Context` but only rewrites the operator-facing message.
pub trait ResultExt<T> {
    /// Replace the message of a `Datastore` error, keeping its detail.
    fn context(self, message: impl Into<String>) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, message: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| match e {
            AppError::Datastore { detail, .. } => AppError::Datastore {
                message: message.into(),
                detail,
            },
            other => other,
        })
    }
}
