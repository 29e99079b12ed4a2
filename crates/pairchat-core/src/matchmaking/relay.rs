//! Relay dispatcher
//!
//! Forwards messages and typing signals from one session member to the other.
//! Relaying never changes the queue or the table.

use super::MatchmakingState;
use crate::entities::ChatMessage;
use crate::error::{MatchError, MatchResult};
use crate::events::{Notification, Outbound};
use crate::traits::ConnectionRegistry;
use crate::value_objects::ConnectionId;

impl MatchmakingState {
    /// Forward a chat message to the sender's partner
    ///
    /// Returns the notification to deliver; the caller acknowledges the sender
    /// once delivery has been handed to the transport.
    pub fn relay<R>(
        &self,
        sender: ConnectionId,
        message: ChatMessage,
        registry: &R,
    ) -> MatchResult<Outbound>
    where
        R: ConnectionRegistry + ?Sized,
    {
        message.check()?;
        let partner = self.live_partner(sender, registry)?;

        tracing::trace!(
            connection_id = %sender,
            partner_id = %partner,
            length = message.text.len(),
            "Relaying message"
        );

        Ok(Outbound::new(partner, Notification::Message(message)))
    }

    /// Forward a typing signal, or nothing when there is no live partner
    pub fn relay_typing<R>(&self, sender: ConnectionId, registry: &R) -> Option<Outbound>
    where
        R: ConnectionRegistry + ?Sized,
    {
        self.live_partner(sender, registry)
            .ok()
            .map(|partner| Outbound::new(partner, Notification::Typing))
    }

    fn live_partner<R>(&self, sender: ConnectionId, registry: &R) -> MatchResult<ConnectionId>
    where
        R: ConnectionRegistry + ?Sized,
    {
        let partner = self.sessions.get(sender).ok_or(MatchError::NoPartner)?;

        if registry.is_live(partner) {
            Ok(partner)
        } else {
            // Left for the disconnect handler or the sweep to clean up
            tracing::debug!(
                connection_id = %sender,
                error = %MatchError::StaleReference(partner),
                "Relay target is gone"
            );
            Err(MatchError::NoPartner)
        }
    }
}
