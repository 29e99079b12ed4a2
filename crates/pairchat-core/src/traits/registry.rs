//! Connection registry trait
//!
//! The transport owns connections; the engine only asks whether an id still
//! refers to one. Liveness is re-checked at every use and never cached.

use std::collections::HashSet;

use crate::value_objects::ConnectionId;

/// Read-only oracle answering "is this connection still live"
pub trait ConnectionRegistry {
    /// Check whether the connection is registered and usable
    fn is_live(&self, id: ConnectionId) -> bool;
}

impl ConnectionRegistry for HashSet<ConnectionId> {
    fn is_live(&self, id: ConnectionId) -> bool {
        self.contains(&id)
    }
}
