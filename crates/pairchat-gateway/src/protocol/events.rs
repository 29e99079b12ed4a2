//! Gateway event names

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event names carried in the `event` field of every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    // Client → server
    /// Ask to be paired with a stranger
    #[serde(rename = "startChat")]
    StartChat,
    /// Client is ready to receive session events
    #[serde(rename = "chatReady")]
    ChatReady,
    /// End the current session
    #[serde(rename = "leaveChat")]
    LeaveChat,

    // Both directions
    /// Chat message
    #[serde(rename = "message")]
    Message,
    /// Typing indicator
    #[serde(rename = "typing")]
    Typing,

    // Server → client
    /// Sent on connect
    #[serde(rename = "hello")]
    Hello,
    /// A new session was formed
    #[serde(rename = "chatStarted")]
    ChatStarted,
    /// The current session was re-announced
    #[serde(rename = "partner_found")]
    PartnerFound,
    /// The partner is gone
    #[serde(rename = "partner_disconnected")]
    PartnerDisconnected,
    /// Something the client sent could not be handled
    #[serde(rename = "error")]
    Error,
    /// Reply to a client frame that carried an `ack` id
    #[serde(rename = "ack")]
    Ack,
}

impl EventName {
    /// Get the wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartChat => "startChat",
            Self::ChatReady => "chatReady",
            Self::LeaveChat => "leaveChat",
            Self::Message => "message",
            Self::Typing => "typing",
            Self::Hello => "hello",
            Self::ChatStarted => "chatStarted",
            Self::PartnerFound => "partner_found",
            Self::PartnerDisconnected => "partner_disconnected",
            Self::Error => "error",
            Self::Ack => "ack",
        }
    }

    /// Check if a client may send this event
    #[must_use]
    pub const fn is_client_event(self) -> bool {
        matches!(
            self,
            Self::StartChat | Self::ChatReady | Self::LeaveChat | Self::Message | Self::Typing
        )
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
