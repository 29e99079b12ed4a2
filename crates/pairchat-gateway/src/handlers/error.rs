//! Handler error types

use crate::protocol::EventName;
use pairchat_core::MatchError;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame could not be decoded
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Client sent an event only the server may send
    #[error("Unexpected event: {0}")]
    UnexpectedEvent(EventName),

    /// Matchmaking refused the request
    #[error(transparent)]
    Match(#[from] MatchError),
}

impl HandlerError {
    /// Machine-readable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::UnexpectedEvent(_) => "UNEXPECTED_EVENT",
            Self::Match(e) => e.code(),
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
