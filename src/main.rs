//! verse-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use verse_gateway::api;
use verse_gateway::app_state::AppState;
use verse_gateway::auth::SessionStore;
use verse_gateway::config::GatewayConfig;
use verse_gateway::storage;
use verse_gateway::storage::seed::ensure_seed_data;
use verse_gateway::ws::ChangeBroadcaster;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting verse-gateway");

    // Select and initialize the storage backend
    let store = storage::connect(&config).await?;
    if config.seed_on_startup {
        ensure_seed_data(store.as_ref(), &config).await?;
    }

    // Build application state
    let app_state = AppState {
        storage: store,
        broadcaster: ChangeBroadcaster::new(config.broadcast_capacity),
        sessions: SessionStore::new(config.session_ttl_hours),
    };

    // Build router
    let app = api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
