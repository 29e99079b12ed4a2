//! Connection identifier
//!
//! A random (v4) UUID assigned when a socket is accepted. It stays stable for
//! the lifetime of that socket and is never reused.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of one live client connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from the hyphenated string representation
    pub fn parse(s: &str) -> Result<Self, ConnectionIdParseError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ConnectionIdParseError::InvalidFormat)
    }
}

/// Error when parsing a ConnectionId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionIdParseError {
    #[error("invalid connection id format")]
    InvalidFormat,
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for ConnectionId {
    type Err = ConnectionIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
