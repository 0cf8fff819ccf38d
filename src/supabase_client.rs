use crate::errors::AppError;
use crate::models::{Lead, LeadId};
use crate::store::LeadStore;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::json;
use url::Url;

/// `LeadStore` backed by a Supabase project's PostgREST API.
///
/// Reads use an `or=(telefone.eq.A,telefone.eq.B)` filter, updates a
/// `PATCH ?id=eq.{id}`. Both authenticate with the project key.
#[derive(Clone)]
pub struct SupabaseLeadStore {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    schema: Option<String>,
}

impl SupabaseLeadStore {
    /// Creates a new `SupabaseLeadStore`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The Supabase project URL (e.g. `https://xyz.supabase.co`).
    /// * `api_key` - The project key, sent as `apikey` and bearer token.
    /// * `table` - Leads table, optionally qualified as `schema.table`.
    pub fn new(base_url: &str, api_key: String, table: &str) -> Result<Self, AppError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("Invalid Supabase URL: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let (schema, table) = match table.split_once('.') {
            Some((schema, table)) => (Some(schema.to_string()), table),
            None => (None, table),
        };

        let endpoint = base
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| AppError::Internal(format!("Invalid Supabase table path: {}", e)))?;

        let client = reqwest::Client::builder().build().map_err(|e| {
            AppError::Internal(format!("Failed to create Supabase client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            schema,
        })
    }

    /// REST endpoint of the leads table.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.endpoint.clone())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key));

        // PostgREST picks non-default schemas from the profile headers
        if let Some(ref schema) = self.schema {
            builder = builder
                .header("Accept-Profile", schema)
                .header("Content-Profile", schema);
        }
        builder
    }
}

/// Builds the PostgREST `or` filter for a set of phone candidates.
pub fn phone_filter(candidates: &[String]) -> String {
    let clauses: Vec<String> = candidates
        .iter()
        .map(|c| format!("telefone.eq.{}", c))
        .collect();
    format!("({})", clauses.join(","))
}

/// Turns a non-2xx PostgREST reply into a datastore error.
///
/// PostgREST errors are JSON with a `message` field; anything else is
/// reported as the raw body.
async fn error_from_response(response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    tracing::warn!("Supabase returned {}: {}", status, body);

    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);

    AppError::datastore(detail)
}

#[async_trait]
impl LeadStore for SupabaseLeadStore {
    async fn find_by_phones(&self, candidates: &[String]) -> Result<Vec<Lead>, AppError> {
        let filter = phone_filter(candidates);
        tracing::debug!("Supabase lookup: or={}", filter);

        let response = self
            .request(Method::GET)
            .query(&[("select", "*"), ("or", filter.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let leads: Vec<Lead> = response.json().await.map_err(|e| {
            AppError::datastore(format!("Failed to parse Supabase response: {}", e))
        })?;

        tracing::debug!("Supabase lookup returned {} row(s)", leads.len());
        Ok(leads)
    }

    async fn update_ia_status(&self, id: &LeadId, status: &str) -> Result<(), AppError> {
        let id_filter = format!("eq.{}", id);
        tracing::debug!("Supabase update: id={} ia_on_off={}", id_filter, status);

        let response = self
            .request(Method::PATCH)
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=minimal")
            .json(&json!({ "ia_on_off": status }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }
}
