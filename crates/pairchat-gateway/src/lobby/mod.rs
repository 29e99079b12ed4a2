//! Lobby
//!
//! Owns the matchmaking state for the whole gateway. Every operation takes the
//! single state lock, runs the engine, and queues the resulting notifications
//! before releasing it, so two notifications for the same connection always
//! arrive in the order they were produced.

use crate::connection::{ConnectionManager, DeliveryError};
use crate::protocol::GatewayMessage;
use pairchat_core::{
    ChatMessage, ConnectionId, MatchError, MatchResult, MatchmakingState, Outbound, SweepReport,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Queue and session counts at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyStats {
    pub waiting: usize,
    pub sessions: usize,
}

/// Shared matchmaking front for all connection tasks
pub struct Lobby {
    state: Mutex<MatchmakingState>,
    connections: Arc<ConnectionManager>,
}

impl Lobby {
    /// Create an empty lobby over the given connections
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self {
            state: Mutex::new(MatchmakingState::new()),
            connections,
        }
    }

    /// Pair `id` with a waiting stranger, or queue it
    pub fn request_pairing(&self, id: ConnectionId) {
        let mut state = self.state.lock();
        let outbound = state.request_pairing(id, &*self.connections);
        self.deliver_all(outbound);
    }

    /// Re-announce `id`'s current session to both members
    pub fn reaffirm(&self, id: ConnectionId) {
        let mut state = self.state.lock();
        let outbound = state.reaffirm(id, &*self.connections);
        self.deliver_all(outbound);
    }

    /// End `id`'s session or queue entry at its own request
    pub fn leave(&self, id: ConnectionId) {
        let mut state = self.state.lock();
        let outbound = state.leave(id, &*self.connections);
        self.deliver_all(outbound);
    }

    /// Forget a connection that has gone away
    pub fn disconnect(&self, id: ConnectionId) {
        let mut state = self.state.lock();
        let outbound = state.disconnect(id, &*self.connections);
        self.deliver_all(outbound);
    }

    /// Forward a chat message to the sender's partner
    ///
    /// # Errors
    /// Fails if the message is invalid, there is no live partner, or the
    /// partner's outbound queue refused the frame
    pub fn relay(&self, sender: ConnectionId, message: ChatMessage) -> MatchResult<()> {
        let state = self.state.lock();
        let outbound = state.relay(sender, message, &*self.connections)?;

        self.deliver(outbound).map_err(|e| {
            tracing::warn!(connection_id = %sender, error = %e, "Message relay failed");
            MatchError::TransportError(e.to_string())
        })
    }

    /// Forward a typing signal; silently dropped without a live partner
    pub fn relay_typing(&self, sender: ConnectionId) {
        let state = self.state.lock();
        if let Some(outbound) = state.relay_typing(sender, &*self.connections) {
            self.deliver_all(vec![outbound]);
        }
    }

    /// Purge every queue entry and session that refers to a dead connection
    pub fn sweep(&self) -> SweepReport {
        let mut state = self.state.lock();
        let (report, outbound) = state.sweep(&*self.connections);
        self.deliver_all(outbound);
        report
    }

    /// Current queue and session counts
    pub fn stats(&self) -> LobbyStats {
        let state = self.state.lock();
        LobbyStats {
            waiting: state.waiting_count(),
            sessions: state.session_count(),
        }
    }

    /// Get the partner of `id`, if it is in a session
    pub fn partner_of(&self, id: ConnectionId) -> Option<ConnectionId> {
        self.state.lock().partner_of(id)
    }

    /// Check if `id` is in the waiting queue
    pub fn is_waiting(&self, id: ConnectionId) -> bool {
        self.state.lock().is_waiting(id)
    }

    fn deliver(&self, outbound: Outbound) -> Result<(), DeliveryError> {
        let Outbound { to, notification } = outbound;
        tracing::trace!(connection_id = %to, notification = notification.name(), "Delivering");
        self.connections.try_send(to, GatewayMessage::from(notification))
    }

    fn deliver_all(&self, outbound: Vec<Outbound>) {
        for item in outbound {
            let to = item.to;
            if let Err(e) = self.deliver(item) {
                // The sweep or the recipient's own disconnect will reconcile
                tracing::warn!(connection_id = %to, error = %e, "Dropped notification");
            }
        }
    }
}

impl std::fmt::Debug for Lobby {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lobby").finish_non_exhaustive()
    }
}
