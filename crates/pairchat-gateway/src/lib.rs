//! # pairchat-gateway
//!
//! WebSocket gateway that pairs anonymous visitors into one-on-one chats and
//! relays their messages.

pub mod connection;
pub mod handlers;
pub mod lobby;
pub mod protocol;
pub mod server;
pub mod sweeper;

pub use server::{create_app, create_gateway_state, run, run_server, GatewayState};
