//! `typing` handler

use super::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;
use std::sync::Arc;

pub struct TypingHandler;

impl TypingHandler {
    pub fn handle(state: &GatewayState, connection: &Arc<Connection>) -> HandlerResult<()> {
        state.lobby().relay_typing(connection.id());
        Ok(())
    }
}
