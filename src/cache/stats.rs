//! Cache Statistics Module
//!
//! Hit/miss/eviction counters for observing cache effectiveness.

use serde::Serialize;

// == Cache Stats ==
/// Cache effectiveness counters. A read of a stale entry counts as a miss.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads served from a fresh entry
    pub hits: u64,
    /// Reads that found nothing fresh (absent or lazily evicted)
    pub misses: u64,
    /// Entries removed to stay under the capacity bound
    pub evictions: u64,
    /// Current number of entries, including not-yet-swept stale ones
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Recorders ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
