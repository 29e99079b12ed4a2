//! Matchmaking errors - failures reported back to the connection that caused them

use thiserror::Error;

use crate::value_objects::ConnectionId;

/// Errors produced by matchmaking and relay operations
///
/// None of these are fatal: the operation that produced one leaves the waiting
/// queue and session table untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Payload did not have the shape of a chat message
    #[error("Invalid message format: {0}")]
    InvalidMessage(String),

    /// Sender has no session, or its partner is gone
    #[error("Partner not found")]
    NoPartner,

    /// A stored identifier outlived its connection
    #[error("Stale connection reference: {0}")]
    StaleReference(ConnectionId),

    /// The transport could not take the notification
    #[error("Failed to send message: {0}")]
    TransportError(String),
}

impl MatchError {
    /// Get an error code string for client responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMessage(_) => "INVALID_MESSAGE",
            Self::NoPartner => "NO_PARTNER",
            Self::StaleReference(_) => "STALE_REFERENCE",
            Self::TransportError(_) => "TRANSPORT_ERROR",
        }
    }
}

/// Result type for matchmaking operations
pub type MatchResult<T> = Result<T, MatchError>;
