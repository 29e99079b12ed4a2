//! Connection manager
//!
//! Manages all live WebSocket connections using DashMap for thread-safe access,
//! and answers liveness queries for the matchmaking engine.

use super::Connection;
use crate::protocol::GatewayMessage;
use dashmap::DashMap;
use pairchat_core::{ConnectionId, ConnectionRegistry};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Why a frame could not be queued for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("connection not registered")]
    NotConnected,
    #[error("outbound buffer full")]
    BufferFull,
    #[error("connection closed")]
    Closed,
}

/// Manages all live WebSocket connections
pub struct ConnectionManager {
    /// Live connections by ID
    connections: DashMap<ConnectionId, Arc<Connection>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        id: ConnectionId,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> Arc<Connection> {
        let connection = Connection::new(id, sender);
        self.connections.insert(id, connection.clone());

        tracing::debug!(connection_id = %id, "Connection added");

        connection
    }

    /// Remove a connection
    pub fn remove_connection(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        let removed = self.connections.remove(&id).map(|(_, connection)| connection);

        if removed.is_some() {
            tracing::debug!(connection_id = %id, "Connection removed");
        }

        removed
    }

    /// Get a connection by ID
    pub fn get_connection(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(&id).map(|r| r.clone())
    }

    /// Queue a frame for a connection without waiting
    pub fn try_send(&self, id: ConnectionId, message: GatewayMessage) -> Result<(), DeliveryError> {
        let connection = self.connections.get(&id).ok_or(DeliveryError::NotConnected)?;

        connection.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::BufferFull,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Get the total number of registered connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Check if a connection is registered
    pub fn has_connection(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Drop connections whose socket task has already gone away
    pub fn cleanup_closed_connections(&self) -> usize {
        let closed: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|r| r.is_closed())
            .map(|r| *r.key())
            .collect();

        let count = closed
            .into_iter()
            .filter(|id| self.remove_connection(*id).is_some())
            .count();

        if count > 0 {
            tracing::info!(count = count, "Cleaned up closed connections");
        }

        count
    }
}

impl ConnectionRegistry for ConnectionManager {
    fn is_live(&self, id: ConnectionId) -> bool {
        self.connections
            .get(&id)
            .is_some_and(|connection| connection.is_live())
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .finish()
    }
}
