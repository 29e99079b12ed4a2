//! Gateway frame format

use super::{AckPayload, EventName, HelloPayload};
use pairchat_core::{ChatMessage, MatchResult, Notification};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One WebSocket text frame, in either direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Event name
    pub event: EventName,

    /// Event payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Acknowledgment id; a client frame carrying one gets an `ack` reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,
}

impl GatewayMessage {
    /// Create a frame with no payload
    #[must_use]
    pub fn event(event: EventName) -> Self {
        Self {
            event,
            data: None,
            ack: None,
        }
    }

    // === Server Messages ===

    /// Create a `hello` frame
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self {
            data: Some(serde_json::to_value(payload).unwrap_or_default()),
            ..Self::event(EventName::Hello)
        }
    }

    /// Create a forwarded chat `message` frame
    #[must_use]
    pub fn chat_message(message: &ChatMessage) -> Self {
        Self {
            data: Some(serde_json::to_value(message).unwrap_or_default()),
            ..Self::event(EventName::Message)
        }
    }

    /// Create an `error` frame
    #[must_use]
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            data: Some(Value::String(reason.into())),
            ..Self::event(EventName::Error)
        }
    }

    /// Create an `ack` reply
    #[must_use]
    pub fn ack(id: u64, payload: AckPayload) -> Self {
        Self {
            event: EventName::Ack,
            data: Some(serde_json::to_value(payload).unwrap_or_default()),
            ack: Some(id),
        }
    }

    // === Parsing Client Messages ===

    /// Decode the payload of a `message` frame
    pub fn as_chat_message(&self) -> MatchResult<ChatMessage> {
        ChatMessage::from_payload(self.data.clone())
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Notification> for GatewayMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::SessionStarted => Self::event(EventName::ChatStarted),
            Notification::PartnerFound => Self::event(EventName::PartnerFound),
            Notification::PartnerDisconnected => Self::event(EventName::PartnerDisconnected),
            Notification::Message(message) => Self::chat_message(&message),
            Notification::Typing => Self::event(EventName::Typing),
        }
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ack {
            Some(ack) => write!(f, "GatewayMessage(event={}, ack={ack})", self.event),
            None => write!(f, "GatewayMessage(event={})", self.event),
        }
    }
}
