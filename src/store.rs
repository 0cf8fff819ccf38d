use crate::errors::AppError;
use crate::models::{Lead, LeadId};
use async_trait::async_trait;

/// Datastore operations the service needs from the leads table.
///
/// Both methods are a single round trip. Failures come back as
/// `AppError::Datastore` carrying the backend's own message; callers never
/// retry.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Rows whose `telefone` equals any of `candidates`, in backend order.
    ///
    /// Callers must not pass an empty slice: an empty OR filter would be a
    /// full-table match on some backends.
    async fn find_by_phones(&self, candidates: &[String]) -> Result<Vec<Lead>, AppError>;

    /// Sets `ia_on_off` on the single row identified by `id`.
    async fn update_ia_status(&self, id: &LeadId, status: &str) -> Result<(), AppError>;
}
