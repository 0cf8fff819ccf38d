use crate::config::{Config, DatastoreConfig, RateLimit};
use crate::db::Database;
use crate::db_storage::PgLeadStore;
use crate::errors::json_error_responses;
use crate::handlers::{self, AppState};
use crate::openapi;
use crate::store::LeadStore;
use crate::supabase_client::SupabaseLeadStore;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer,
};

/// Largest accepted API request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Connects the datastore client selected by `config`.
pub async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn LeadStore>> {
    match &config.datastore {
        DatastoreConfig::Supabase { url, key } => {
            let client = SupabaseLeadStore::new(url, key.clone(), &config.leads_table)?;
            tracing::info!("✓ Supabase client initialized: {}", client.endpoint());
            let store: Arc<dyn LeadStore> = Arc::new(client);
            Ok(store)
        }
        DatastoreConfig::Postgres { database_url } => {
            let db = Database::new(database_url).await?;
            tracing::info!("Database connection pool established");
            let store: Arc<dyn LeadStore> =
                Arc::new(PgLeadStore::new(db.pool, &config.leads_table));
            Ok(store)
        }
    }
}

/// Builds the full application router.
///
/// `/api` routes get the body limit and, when `rate_limit` is set, per-IP
/// rate limiting; rejections from either are rendered as `ErrorBody` JSON.
/// Anything unmatched falls through to the static files in
/// `static_dir`.
pub fn build_router(
    state: Arc<AppState>,
    static_dir: &str,
    rate_limit: Option<RateLimit>,
) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route("/api/desativar-ia", post(handlers::disable_ai))
        .route("/api/verificar-status", post(handlers::verify_status));

    let api_routes = match rate_limit {
        Some(limit) => {
            let governor_conf = Arc::new(
                GovernorConfigBuilder::default()
                    // Interval between replenished permits, not a count
                    .per_millisecond((1000 / limit.per_second).max(1))
                    .burst_size(limit.burst)
                    .key_extractor(SmartIpKeyExtractor)
                    .finish()
                    .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
            );
            tracing::info!(
                "Rate limiting /api: {} req/s per IP, burst {}",
                limit.per_second,
                limit.burst
            );
            api_routes.layer(
                ServiceBuilder::new()
                    .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                    .layer(GovernorLayer {
                        config: governor_conf,
                    }),
            )
        }
        None => api_routes.layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
    };
    let api_routes = api_routes.layer(middleware::map_response(json_error_responses));

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .merge(api_routes)
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app)
}
