//! Chat message value
//!
//! Messages are never stored. A message is parsed from the sender's payload,
//! validated, and handed to the partner once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{MatchError, MatchResult};

/// Maximum message length in characters
pub const MAX_MESSAGE_LENGTH: u64 = 4000;

/// A text message exchanged between the two members of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatMessage {
    /// Message body, forwarded as-is (whitespace included)
    #[validate(length(
        min = 1,
        max = MAX_MESSAGE_LENGTH,
        message = "Message text must be 1-4000 characters"
    ))]
    pub text: String,

    /// Display timestamp chosen by the sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Any other fields the client attached
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    /// Create a message with only text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: None,
            extra: Map::new(),
        }
    }

    /// Attach a display timestamp
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Decode a message from a raw event payload
    ///
    /// Only checks the shape (an object with a string `text`); content rules are
    /// applied by [`ChatMessage::check`].
    pub fn from_payload(data: Option<Value>) -> MatchResult<Self> {
        let value = data.ok_or_else(|| MatchError::InvalidMessage("missing payload".to_string()))?;
        serde_json::from_value(value).map_err(|e| MatchError::InvalidMessage(e.to_string()))
    }

    /// Apply content rules
    pub fn check(&self) -> MatchResult<()> {
        self.validate()
            .map_err(|e| MatchError::InvalidMessage(e.to_string()))
    }
}
