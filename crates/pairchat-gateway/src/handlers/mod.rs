//! Event handlers
//!
//! Handles incoming WebSocket frames based on their event name.

mod error;
mod leave;
mod message;
mod pairing;
mod ready;
mod typing;

pub use error::{HandlerError, HandlerResult};
pub use leave::LeaveHandler;
pub use message::MessageHandler;
pub use pairing::PairingHandler;
pub use ready::ReadyHandler;
pub use typing::TypingHandler;

use crate::connection::Connection;
use crate::protocol::{AckPayload, EventName, GatewayMessage};
use crate::server::GatewayState;
use std::sync::Arc;

/// Dispatch incoming client frames to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client frame and answer its `ack`, if any
    ///
    /// A failed frame without an `ack` id is answered with an `error` event.
    /// Nothing here closes the connection.
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) {
        let ack = message.ack;
        let event = message.event;
        let result = Self::route(state, connection, &message);

        if let Err(e) = &result {
            tracing::debug!(
                connection_id = %connection.id(),
                event = %event,
                code = e.code(),
                error = %e,
                "Handler error"
            );
        }

        let reply = match (result, ack) {
            (Ok(()), Some(id)) => GatewayMessage::ack(id, AckPayload::ok()),
            (Ok(()), None) => return,
            (Err(e), Some(id)) => GatewayMessage::ack(id, AckPayload::error(e.to_string())),
            (Err(e), None) => GatewayMessage::error(e.to_string()),
        };

        Self::reply(connection, reply).await;
    }

    /// Tell the client a frame could not be decoded at all
    pub async fn reject(connection: &Arc<Connection>, error: &HandlerError) {
        tracing::debug!(connection_id = %connection.id(), error = %error, "Rejected frame");
        Self::reply(connection, GatewayMessage::error(error.to_string())).await;
    }

    fn route(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: &GatewayMessage,
    ) -> HandlerResult<()> {
        // Validate that this is a client-sendable event
        if !message.event.is_client_event() {
            return Err(HandlerError::UnexpectedEvent(message.event));
        }

        match message.event {
            EventName::StartChat => PairingHandler::handle(state, connection),
            EventName::ChatReady => ReadyHandler::handle(state, connection),
            EventName::LeaveChat => LeaveHandler::handle(state, connection),
            EventName::Message => MessageHandler::handle(state, connection, message),
            EventName::Typing => TypingHandler::handle(state, connection),
            // Unreachable given the is_client_event check
            other => Err(HandlerError::UnexpectedEvent(other)),
        }
    }

    async fn reply(connection: &Arc<Connection>, reply: GatewayMessage) {
        if let Err(e) = connection.send(reply).await {
            tracing::debug!(connection_id = %connection.id(), error = %e, "Failed to send reply");
        }
    }
}
