//! Cache Entry Module
//!
//! A single cached response payload with its expiry deadline.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// One cached response payload. The payload is opaque to the cache.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached response body
    pub value: Value,
    /// Write timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Time-to-live in milliseconds, independent per entry
    pub ttl_ms: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(value: Value, ttl_ms: u64) -> Self {
        Self {
            value,
            stored_at: now_ms(),
            ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has gone stale.
    ///
    /// Boundary: an entry is stale once `now - stored_at >= ttl_ms`, so a
    /// zero TTL is stale immediately. Staleness is terminal; a fresh value
    /// for the same key requires a brand-new entry.
    pub fn is_expired(&self) -> bool {
        now_ms().saturating_sub(self.stored_at) >= self.ttl_ms
    }

    // == Time To Live ==
    /// Remaining milliseconds before the entry goes stale (0 once stale).
    pub fn ttl_remaining_ms(&self) -> u64 {
        let deadline = self.stored_at.saturating_add(self.ttl_ms);
        deadline.saturating_sub(now_ms())
    }
}

// == Utility Functions ==
/// Current Unix timestamp in milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
