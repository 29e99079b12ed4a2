//! `startChat` handler

use super::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;
use std::sync::Arc;

/// Handles requests for a new partner
pub struct PairingHandler;

impl PairingHandler {
    /// Queue the connection or pair it with whoever is waiting
    pub fn handle(state: &GatewayState, connection: &Arc<Connection>) -> HandlerResult<()> {
        tracing::debug!(connection_id = %connection.id(), "Chat requested");
        state.lobby().request_pairing(connection.id());
        Ok(())
    }
}
