//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its state.

use crate::protocol::GatewayMessage;
use pairchat_core::ConnectionId;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket open and accepting events
    Connected,
    /// Socket is being torn down
    Disconnecting,
    /// Socket is closed
    Disconnected,
}

/// A single WebSocket connection
pub struct Connection {
    /// Unique connection ID
    id: ConnectionId,

    /// Current connection state
    state: RwLock<ConnectionState>,

    /// Channel to send frames to the WebSocket
    sender: mpsc::Sender<GatewayMessage>,

    /// Last time any frame arrived from the client
    last_seen: Mutex<Instant>,

    /// Monotonic connect time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(id: ConnectionId, sender: mpsc::Sender<GatewayMessage>) -> Arc<Self> {
        Arc::new(Self {
            id,
            state: RwLock::new(ConnectionState::Connected),
            sender,
            last_seen: Mutex::new(Instant::now()),
            created_at: Instant::now(),
        })
    }

    /// Get the connection ID
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Get the current state
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Set the connection state
    pub fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }

    /// Check if this connection can still receive events
    pub fn is_live(&self) -> bool {
        self.state() == ConnectionState::Connected && !self.is_closed()
    }

    /// Record a frame received from the client
    pub fn record_activity(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    /// Get time since the client was last heard from
    pub fn time_since_activity(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Send a frame to this connection, waiting for buffer space
    pub async fn send(
        &self,
        message: GatewayMessage,
    ) -> Result<(), mpsc::error::SendError<GatewayMessage>> {
        self.sender.send(message).await
    }

    /// Try to send a frame (non-blocking)
    pub fn try_send(
        &self,
        message: GatewayMessage,
    ) -> Result<(), mpsc::error::TrySendError<GatewayMessage>> {
        self.sender.try_send(message)
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("age", &self.age())
            .finish()
    }
}
