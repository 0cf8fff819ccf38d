use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use utoipa::ToSchema;

/// `ia_on_off` value for a lead whose AI assistant is disabled.
pub const IA_OFF: &str = "OFF";

/// Opaque lead identifier, echoed back in the shape the datastore sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeadId {
    Int(i64),
    Text(String),
}

impl LeadId {
    /// Rebuilds an id that the datastore returned as text (`id::text`).
    ///
    /// Integers that survive a round trip become `Int`; anything else
    /// (uuids, zero-padded codes) stays `Text`.
    pub fn from_db_text(raw: String) -> Self {
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => LeadId::Int(n),
            _ => LeadId::Text(raw),
        }
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadId::Int(n) => write!(f, "{}", n),
            LeadId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A row of the leads table.
///
/// Columns other than the four the service reasons about are kept in `extra`
/// so the toggle response can echo the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    #[serde(default)]
    pub nome: Option<String>,
    pub telefone: String,
    /// Normally `ON`/`OFF`; any other stored value is passed through.
    #[serde(default)]
    pub ia_on_off: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lead {
    pub fn is_ia_off(&self) -> bool {
        self.ia_on_off.as_deref() == Some(IA_OFF)
    }

    /// Client-side merge of a successful status update.
    pub fn with_ia_status(mut self, status: &str) -> Self {
        self.ia_on_off = Some(status.to_string());
        self
    }

    /// Read-only projection returned by the status endpoint.
    pub fn status(&self) -> LeadStatus {
        LeadStatus {
            nome: self.nome.clone(),
            telefone: self.telefone.clone(),
            ia_on_off: self.ia_on_off.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeadStatus {
    pub nome: Option<String>,
    pub telefone: String,
    pub ia_on_off: Option<String>,
}

/// Body of `POST /api/desativar-ia` and `POST /api/verificar-status`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PhoneRequest {
    /// Raw phone as typed by the operator. Numbers are accepted too.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "(11) 98888-7777")]
    pub telefone: Option<Value>,
}

impl PhoneRequest {
    /// Extracts the raw phone text.
    ///
    /// `None` when the field is absent or null; numbers are converted to their
    /// decimal text; any other JSON type is rejected.
    pub fn phone(&self) -> Result<Option<String>, AppError> {
        match &self.telefone {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(AppError::Validation(
                "Telefone deve ser texto".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DisableAiResponse {
    pub success: bool,
    pub message: String,
    /// `ia_on_off` as it was stored before this request.
    pub ia_on_off_anterior: Option<String>,
    #[schema(value_type = Object)]
    pub lead: Lead,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
    pub lead: LeadStatus,
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: String, error: Option<String>) -> Self {
        Self {
            success: false,
            message,
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
