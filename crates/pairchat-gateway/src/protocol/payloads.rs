//! Payload definitions for server frames

use pairchat_core::ConnectionId;
use serde::Serialize;

/// Payload of `hello`
#[derive(Debug, Clone, Serialize)]
pub struct HelloPayload {
    /// Identifier the server assigned to this connection
    pub connection_id: ConnectionId,
    /// Milliseconds between server pings
    pub heartbeat_interval: u64,
}

/// Payload of `ack`
///
/// Serializes as `{"success": true}` or `{"error": "<reason>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AckPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckPayload {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: Some(true),
            error: None,
        }
    }

    #[must_use]
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(reason.into()),
        }
    }
}
