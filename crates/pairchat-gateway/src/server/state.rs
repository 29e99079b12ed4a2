//! Gateway state
//!
//! Application state for the gateway server.

use crate::connection::ConnectionManager;
use crate::lobby::Lobby;
use crate::sweeper::Sweeper;
use pairchat_common::AppConfig;
use std::sync::Arc;
use std::time::Instant;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Matchmaking front shared by every connection task
    lobby: Arc<Lobby>,
    /// Connection manager for WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Background stale-state sweeper
    sweeper: Arc<Sweeper>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    started_at: Instant,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        lobby: Arc<Lobby>,
        connection_manager: Arc<ConnectionManager>,
        sweeper: Arc<Sweeper>,
        config: AppConfig,
    ) -> Self {
        Self {
            lobby,
            connection_manager,
            sweeper,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Get the lobby
    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the sweeper
    pub fn sweeper(&self) -> &Sweeper {
        &self.sweeper
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the time the gateway was started
    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("lobby", &self.lobby)
            .field("connection_manager", &self.connection_manager)
            .field("config", &"AppConfig")
            .finish()
    }
}
