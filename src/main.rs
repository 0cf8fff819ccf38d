use lead_ia_toggle::app::{build_router, connect_store};
use lead_ia_toggle::config::Config;
use lead_ia_toggle::handlers::AppState;
use lead_ia_toggle::services::LeadLookupService;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, validates the configuration (refusing to start
/// without a datastore endpoint and credential), connects the datastore
/// client and serves the HTTP API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_ia_toggle=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Invalid configuration: {}", e);
            return Err(e);
        }
    };

    let store = connect_store(&config).await?;
    let app_state = Arc::new(AppState {
        leads: LeadLookupService::new(store),
    });

    let app = build_router(app_state, &config.static_dir, config.rate_limit)?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Server listening on {}", addr);

    // Connect info lets the rate limiter fall back to the peer address
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
