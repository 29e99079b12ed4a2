//! Matchmaking state and the pairing engine
//!
//! `MatchmakingState` owns the waiting queue and the session table as one unit.
//! Pairing touches both, so they are never locked or mutated separately.

use super::{SessionTable, WaitingQueue};
use crate::events::{Notification, Outbound};
use crate::traits::ConnectionRegistry;
use crate::value_objects::ConnectionId;

/// Waiting queue and session table for one server process
#[derive(Debug, Clone, Default)]
pub struct MatchmakingState {
    pub(super) queue: WaitingQueue,
    pub(super) sessions: SessionTable,
}

impl MatchmakingState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the waiting queue
    pub fn queue(&self) -> &WaitingQueue {
        &self.queue
    }

    /// Read-only view of the session table
    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    /// Get the current partner of `id`
    pub fn partner_of(&self, id: ConnectionId) -> Option<ConnectionId> {
        self.sessions.get(id)
    }

    /// Check if `id` is waiting for a partner
    pub fn is_waiting(&self, id: ConnectionId) -> bool {
        self.queue.contains(id)
    }

    /// Number of connections waiting for a partner
    pub fn waiting_count(&self) -> usize {
        self.queue.len()
    }

    /// Number of active sessions
    pub fn session_count(&self) -> usize {
        self.sessions.session_count()
    }

    /// Find a partner for `id`, or put it in the waiting queue
    ///
    /// Requests from a connection that is already in a session are ignored, as
    /// are requests from a connection that has since gone away. The first live
    /// connection in arrival order wins. A dead candidate at the head of the
    /// queue is dropped and `id` waits instead.
    pub fn request_pairing<R>(&mut self, id: ConnectionId, registry: &R) -> Vec<Outbound>
    where
        R: ConnectionRegistry + ?Sized,
    {
        if !registry.is_live(id) {
            tracing::debug!(connection_id = %id, "Pairing requested by dead connection, ignoring");
            return Vec::new();
        }

        if let Some(partner) = self.sessions.get(id) {
            tracing::debug!(
                connection_id = %id,
                partner_id = %partner,
                "Connection already in a session"
            );
            return Vec::new();
        }

        let Some(candidate) = self.queue.dequeue_next_other_than(id) else {
            if self.queue.enqueue(id) {
                tracing::info!(
                    connection_id = %id,
                    waiting = self.queue.len(),
                    "Connection waiting for a partner"
                );
            }
            return Vec::new();
        };

        if !registry.is_live(candidate) {
            tracing::debug!(
                connection_id = %id,
                candidate_id = %candidate,
                "Dropped stale candidate from waiting queue"
            );
            self.queue.enqueue(id);
            return Vec::new();
        }

        self.queue.remove(id);
        if !self.sessions.set(id, candidate) {
            // Unreachable while the queue/table invariants hold
            tracing::error!(
                connection_id = %id,
                candidate_id = %candidate,
                "Refused to record session"
            );
            self.queue.enqueue(candidate);
            return Vec::new();
        }

        tracing::info!(
            connection_id = %id,
            partner_id = %candidate,
            sessions = self.sessions.session_count(),
            "Session started"
        );

        vec![
            Outbound::new(id, Notification::SessionStarted),
            Outbound::new(candidate, Notification::SessionStarted),
        ]
    }

    /// Re-announce an existing session to both members
    ///
    /// Used when a client becomes ready to receive events and may have missed
    /// the initial `SessionStarted`. If the recorded partner is gone, the
    /// session is torn down and `id` is told so. A signal from a connection
    /// that has itself gone away is ignored; its disconnect cleans up.
    pub fn reaffirm<R>(&mut self, id: ConnectionId, registry: &R) -> Vec<Outbound>
    where
        R: ConnectionRegistry + ?Sized,
    {
        if !registry.is_live(id) {
            tracing::debug!(connection_id = %id, "Ready signal from dead connection, ignoring");
            return Vec::new();
        }

        let Some(partner) = self.sessions.get(id) else {
            tracing::trace!(connection_id = %id, "Ready signal without a session");
            return Vec::new();
        };

        if registry.is_live(partner) {
            tracing::debug!(connection_id = %id, partner_id = %partner, "Session reaffirmed");
            return vec![
                Outbound::new(id, Notification::PartnerFound),
                Outbound::new(partner, Notification::PartnerFound),
            ];
        }

        tracing::info!(
            connection_id = %id,
            partner_id = %partner,
            "Partner no longer connected, ending session"
        );
        self.sessions.clear(id);
        vec![Outbound::new(id, Notification::PartnerDisconnected)]
    }

    /// End the session of `id` at its own request
    ///
    /// The partner is notified and is not re-queued; `id` is also removed from
    /// the waiting queue so a following pairing request starts fresh.
    pub fn leave<R>(&mut self, id: ConnectionId, registry: &R) -> Vec<Outbound>
    where
        R: ConnectionRegistry + ?Sized,
    {
        let notifications = self.detach(id, registry);
        tracing::debug!(connection_id = %id, "Connection left its session");
        notifications
    }

    /// Remove `id` from the queue and the table, notifying a live partner
    pub(super) fn detach<R>(&mut self, id: ConnectionId, registry: &R) -> Vec<Outbound>
    where
        R: ConnectionRegistry + ?Sized,
    {
        self.queue.remove(id);

        match self.sessions.clear(id) {
            Some(partner) if registry.is_live(partner) => {
                tracing::info!(
                    connection_id = %id,
                    partner_id = %partner,
                    "Notifying partner of session end"
                );
                vec![Outbound::new(partner, Notification::PartnerDisconnected)]
            }
            Some(partner) => {
                tracing::debug!(
                    connection_id = %id,
                    partner_id = %partner,
                    "Session ended, partner already gone"
                );
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Check the queue/table invariants, describing the first violation found
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        for (id, partner) in self.sessions.iter() {
            if id == partner {
                return Err(format!("{id} is paired with itself"));
            }
            if self.sessions.get(partner) != Some(id) {
                return Err(format!("{id} -> {partner} is not symmetric"));
            }
            if self.queue.contains(id) {
                return Err(format!("{id} is both paired and waiting"));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for id in self.queue.iter() {
            if !seen.insert(id) {
                return Err(format!("{id} is queued twice"));
            }
        }
        Ok(())
    }
}
