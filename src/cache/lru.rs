//! Access Order Module
//!
//! Tracks key access recency for the optional capacity bound on the store.

use std::collections::VecDeque;

// == Access Order ==
/// Key access order, front = most recently used, back = least recently used.
///
/// Only consulted when the store is built with a maximum entry count; the
/// unbounded store keeps it in sync but never evicts from it.
#[derive(Debug, Default)]
pub struct AccessOrder {
    order: VecDeque<String>,
}

impl AccessOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Promote ==
    /// Marks a key as just used, moving (or inserting) it at the front.
    pub fn promote(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Drops a key from the order. A no-op for untracked keys.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used key, if any.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
