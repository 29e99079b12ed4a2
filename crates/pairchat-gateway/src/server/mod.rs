//! Gateway server setup
//!
//! Provides the WebSocket server configuration, routes and middleware.

mod handler;
mod health;
mod state;

pub use handler::gateway_handler;
pub use health::{health_check, stats, StatsResponse};
pub use state::GatewayState;

use crate::connection::ConnectionManager;
use crate::lobby::Lobby;
use crate::sweeper::Sweeper;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use pairchat_common::{AppConfig, AppError, AppResult, CorsConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
        .route("/stats", get(stats))
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    let config = state.config();
    let cors = create_cors_layer(&config.cors, config.app.env.is_production());

    create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new().allow_methods([Method::GET, Method::POST]);

    if config.allowed_origins.is_empty() {
        if is_production {
            tracing::warn!(
                "CORS: Allowing any origin in production. \
                 Configure CORS_ALLOWED_ORIGINS to restrict it."
            );
        } else {
            tracing::debug!("CORS: Allowing any origin");
        }
        return base_layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    tracing::info!("CORS: Allowing {} configured origins", origins.len());
    base_layer.allow_origin(AllowOrigin::list(origins))
}

/// Wire up the lobby, connection manager and sweeper
///
/// Starts the sweeper, so this must be called from within a Tokio runtime.
pub fn create_gateway_state(config: AppConfig) -> GatewayState {
    let connection_manager = ConnectionManager::new_shared();
    let lobby = Arc::new(Lobby::new(connection_manager.clone()));

    let sweeper = Arc::new(Sweeper::new(
        lobby.clone(),
        connection_manager.clone(),
        config.matchmaking.sweep_interval(),
    ));
    sweeper.clone().start();

    GatewayState::new(lobby, connection_manager, sweeper, config)
}

/// Run the gateway server until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> AppResult<()> {
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::server)?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    // Create gateway state
    let state = create_gateway_state(config);
    let sweeper_state = state.clone();

    // Build application
    let app = create_app(state);

    // Run server
    let result = run_server(app, addr).await;
    sweeper_state.sweeper().stop();
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        // Never resolve rather than shutting down immediately
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
