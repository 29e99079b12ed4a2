//! Outbound notifications produced by the matchmaking engine

mod notification;

pub use notification::{Notification, Outbound};
