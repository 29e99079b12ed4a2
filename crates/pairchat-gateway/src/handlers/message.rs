//! `message` handler

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::GatewayMessage;
use crate::server::GatewayState;
use std::sync::Arc;

/// Handles chat messages bound for the partner
pub struct MessageHandler;

impl MessageHandler {
    /// Validate the payload and forward it
    ///
    /// The sender learns the outcome through its `ack`; a message without one
    /// only hears back on failure.
    pub fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: &GatewayMessage,
    ) -> HandlerResult<()> {
        let chat_message = message.as_chat_message()?;
        state.lobby().relay(connection.id(), chat_message)?;
        Ok(())
    }
}
