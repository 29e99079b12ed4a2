//! `leaveChat` handler

use super::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;
use std::sync::Arc;

/// Handles a client ending its chat without disconnecting
pub struct LeaveHandler;

impl LeaveHandler {
    pub fn handle(state: &GatewayState, connection: &Arc<Connection>) -> HandlerResult<()> {
        tracing::debug!(connection_id = %connection.id(), "Chat left");
        state.lobby().leave(connection.id());
        Ok(())
    }
}
