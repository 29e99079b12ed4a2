//! Health and stats endpoints

use super::GatewayState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot served at `/stats`
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Registered WebSocket connections
    pub connections: usize,
    /// Connections waiting for a partner
    pub waiting: usize,
    /// Active one-on-one sessions
    pub sessions: usize,
    pub server_time: DateTime<Utc>,
    /// Seconds since start
    pub uptime: u64,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Stats endpoint
pub async fn stats(State(state): State<GatewayState>) -> Json<StatsResponse> {
    let lobby = state.lobby().stats();

    Json(StatsResponse {
        connections: state.connection_manager().connection_count(),
        waiting: lobby.waiting,
        sessions: lobby.sessions,
        server_time: Utc::now(),
        uptime: state.started_at().elapsed().as_secs(),
    })
}
