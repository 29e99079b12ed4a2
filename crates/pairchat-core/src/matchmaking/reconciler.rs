//! Lifecycle reconciler
//!
//! Cleans up after connections that went away: immediately on a disconnect
//! event, and periodically via a sweep that catches anything a missed or failed
//! disconnect left behind.

use super::MatchmakingState;
use crate::events::{Notification, Outbound};
use crate::traits::ConnectionRegistry;
use crate::value_objects::ConnectionId;

/// What a sweep removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Dead connections dropped from the waiting queue
    pub stale_waiting: usize,
    /// Sessions torn down because a member was dead
    pub stale_sessions: usize,
}

impl SweepReport {
    /// Check if the sweep found nothing to do
    pub fn is_clean(&self) -> bool {
        self.stale_waiting == 0 && self.stale_sessions == 0
    }
}

impl MatchmakingState {
    /// Handle a connection's disconnect
    ///
    /// Removes it from the queue and ends its session. A live partner gets
    /// exactly one `PartnerDisconnected` and must ask for a new partner itself.
    pub fn disconnect<R>(&mut self, id: ConnectionId, registry: &R) -> Vec<Outbound>
    where
        R: ConnectionRegistry + ?Sized,
    {
        let notifications = self.detach(id, registry);

        tracing::debug!(
            connection_id = %id,
            waiting = self.queue.len(),
            sessions = self.sessions.session_count(),
            "Disconnect reconciled"
        );

        notifications
    }

    /// Drop every queue entry and session that refers to a dead connection
    pub fn sweep<R>(&mut self, registry: &R) -> (SweepReport, Vec<Outbound>)
    where
        R: ConnectionRegistry + ?Sized,
    {
        let mut report = SweepReport {
            stale_waiting: self.queue.retain(|id| registry.is_live(id)),
            ..SweepReport::default()
        };
        let mut notifications = Vec::new();

        let stale: Vec<ConnectionId> = self
            .sessions
            .ids()
            .filter(|id| !registry.is_live(*id))
            .collect();

        for id in stale {
            // The partner's own entry may already be gone if both were dead
            let Some(partner) = self.sessions.clear(id) else {
                continue;
            };
            report.stale_sessions += 1;

            tracing::debug!(connection_id = %id, partner_id = %partner, "Swept stale session");

            if registry.is_live(partner) {
                notifications.push(Outbound::new(partner, Notification::PartnerDisconnected));
            }
        }

        (report, notifications)
    }
}
