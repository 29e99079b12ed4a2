//! `chatReady` handler

use super::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;
use std::sync::Arc;

/// Handles the client's ready signal after `chatStarted`
pub struct ReadyHandler;

impl ReadyHandler {
    /// Announce `partner_found` to both members of the session, if any
    pub fn handle(state: &GatewayState, connection: &Arc<Connection>) -> HandlerResult<()> {
        state.lobby().reaffirm(connection.id());
        Ok(())
    }
}
