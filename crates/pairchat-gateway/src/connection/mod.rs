//! Connection management
//!
//! Tracks live WebSocket connections. The [`ConnectionManager`] is the
//! connection registry the matchmaking engine consults before using any id.

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState};
pub use manager::{ConnectionManager, DeliveryError};
