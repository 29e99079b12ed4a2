//! Session table
//!
//! Authoritative record of who is paired with whom. Every session is stored in
//! both directions, and both directions are always added and removed together.

use std::collections::HashMap;

use crate::value_objects::ConnectionId;

/// Symmetric connection → partner mapping
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    partners: HashMap<ConnectionId, ConnectionId>,
}

impl SessionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the partner of `id`
    pub fn get(&self, id: ConnectionId) -> Option<ConnectionId> {
        self.partners.get(&id).copied()
    }

    /// Record a session between `a` and `b`
    ///
    /// Refuses (returns `false`) when `a == b` or either side is already paired.
    pub fn set(&mut self, a: ConnectionId, b: ConnectionId) -> bool {
        if a == b || self.contains(a) || self.contains(b) {
            return false;
        }
        self.partners.insert(a, b);
        self.partners.insert(b, a);
        true
    }

    /// Tear down the session `id` belongs to, returning the former partner
    pub fn clear(&mut self, id: ConnectionId) -> Option<ConnectionId> {
        let partner = self.partners.remove(&id)?;
        if self.partners.get(&partner) == Some(&id) {
            self.partners.remove(&partner);
        }
        Some(partner)
    }

    /// Check if `id` is in a session
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.partners.contains_key(&id)
    }

    /// Number of connections that are in a session
    pub fn len(&self) -> usize {
        self.partners.len()
    }

    /// Check if there are no sessions
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Number of sessions
    pub fn session_count(&self) -> usize {
        self.partners.len() / 2
    }

    /// All paired connection ids
    pub fn ids(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.partners.keys().copied()
    }

    /// Iterate over `(id, partner)` entries
    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, ConnectionId)> + '_ {
        self.partners.iter().map(|(id, partner)| (*id, *partner))
    }
}
