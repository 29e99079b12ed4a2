//! Notifications addressed to a single connection

use crate::entities::ChatMessage;
use crate::value_objects::ConnectionId;

/// Something a connection needs to be told
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A new session was formed with this connection as a member
    SessionStarted,
    /// The existing session was re-announced
    PartnerFound,
    /// The partner left or vanished; the session is gone
    PartnerDisconnected,
    /// A message forwarded from the partner
    Message(ChatMessage),
    /// The partner is typing
    Typing,
}

impl Notification {
    /// Get the name of this notification
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SessionStarted => "SessionStarted",
            Self::PartnerFound => "PartnerFound",
            Self::PartnerDisconnected => "PartnerDisconnected",
            Self::Message(_) => "Message",
            Self::Typing => "Typing",
        }
    }
}

/// A notification and its recipient
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: ConnectionId,
    pub notification: Notification,
}

impl Outbound {
    pub fn new(to: ConnectionId, notification: Notification) -> Self {
        Self { to, notification }
    }
}
