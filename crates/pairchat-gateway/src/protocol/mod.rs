//! Gateway protocol definitions
//!
//! Every frame is a JSON object `{"event": ..., "data": ..., "ack": ...}`.
//! Event names match what existing browser clients already emit and listen for.

mod events;
mod messages;
mod payloads;

pub use events::EventName;
pub use messages::GatewayMessage;
pub use payloads::{AckPayload, HelloPayload};
