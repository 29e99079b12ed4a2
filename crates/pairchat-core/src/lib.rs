//! # pairchat-core
//!
//! Domain layer containing connection identifiers, the chat message value type,
//! outbound notifications, and the matchmaking engine that pairs anonymous
//! connections and relays messages between them.
//!
//! This crate performs no I/O. Every engine operation is synchronous and returns
//! the notifications it wants delivered; the caller delivers them after releasing
//! whatever lock guards the [`MatchmakingState`].

pub mod entities;
pub mod error;
pub mod events;
pub mod matchmaking;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ChatMessage, MAX_MESSAGE_LENGTH};
pub use error::{MatchError, MatchResult};
pub use events::{Notification, Outbound};
pub use matchmaking::{MatchmakingState, SessionTable, SweepReport, WaitingQueue};
pub use traits::ConnectionRegistry;
pub use value_objects::{ConnectionId, ConnectionIdParseError};
