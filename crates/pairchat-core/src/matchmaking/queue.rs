//! Waiting queue
//!
//! Connections looking for a partner, in arrival order. The queue is expected to
//! hold a handful of entries for a few seconds each, so lookups are linear scans.

use std::collections::VecDeque;

use crate::value_objects::ConnectionId;

/// Ordered set of connections awaiting a partner
#[derive(Debug, Clone, Default)]
pub struct WaitingQueue {
    entries: VecDeque<ConnectionId>,
}

impl WaitingQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless it is already waiting
    ///
    /// Returns `true` if the id was added.
    pub fn enqueue(&mut self, id: ConnectionId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.entries.push_back(id);
        true
    }

    /// Remove and return the first entry that is not `id`
    ///
    /// `id` itself is never returned and keeps its place if it is waiting.
    pub fn dequeue_next_other_than(&mut self, id: ConnectionId) -> Option<ConnectionId> {
        let index = self.entries.iter().position(|entry| *entry != id)?;
        self.entries.remove(index)
    }

    /// Remove `id` if present
    ///
    /// Returns `true` if it was waiting.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        match self.entries.iter().position(|entry| *entry == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Keep only entries matching the predicate, returning how many were dropped
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(ConnectionId) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|entry| keep(*entry));
        before - self.entries.len()
    }

    /// Check if `id` is waiting
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.entries.contains(&id)
    }

    /// Number of waiting connections
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nobody is waiting
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in arrival order
    pub fn iter(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.entries.iter().copied()
    }
}
