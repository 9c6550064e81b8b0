//! Cache Store Module
//!
//! In-memory response store combining HashMap storage with per-entry TTL
//! expiry and an optional LRU-bounded capacity.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::{AccessOrder, CacheEntry, CacheStats};

// == Api Cache ==
/// Response payload store with lazy TTL eviction.
///
/// Every store operation is a total function. A missing key is an absent
/// result, not an error. The map may hold stale entries between sweeps,
/// so every read applies the freshness check and evicts lazily. Fresh
/// results never depend on the periodic sweep having run.
#[derive(Debug)]
pub struct ApiCache {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Access recency, used for eviction when a capacity bound is set
    order: AccessOrder,
    /// Hit/miss/eviction counters
    stats: CacheStats,
    /// Default TTL in milliseconds for entries stored without an explicit TTL
    default_ttl_ms: u64,
    /// Maximum entry count, None = unbounded
    max_entries: Option<usize>,
}

impl ApiCache {
    // == Constructors ==
    /// Creates an unbounded cache with the given default TTL.
    pub fn new(default_ttl_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            order: AccessOrder::new(),
            stats: CacheStats::new(),
            default_ttl_ms,
            max_entries: None,
        }
    }

    /// Creates a cache bounded to `max_entries` (clamped to at least 1),
    /// evicting least-recently-used entries once full.
    pub fn with_capacity(default_ttl_ms: u64, max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::new(default_ttl_ms)
        }
    }

    /// Default TTL applied when `set` is called without an explicit TTL.
    pub fn default_ttl_ms(&self) -> u64 {
        self.default_ttl_ms
    }

    // == Set ==
    /// Inserts or overwrites the entry for `key`, stamping it with the
    /// current time. An overwrite resets the expiry clock.
    ///
    /// Always succeeds. When a capacity bound is configured and a new key
    /// would exceed it, expired entries are swept first and then
    /// least-recently-used entries are evicted until the new entry fits.
    pub fn set(&mut self, key: String, value: Value, ttl_ms: Option<u64>) {
        let is_overwrite = self.entries.contains_key(&key);

        if let Some(max) = self.max_entries {
            if !is_overwrite && self.entries.len() >= max {
                // Prefer reclaiming already-stale entries over live ones
                self.sweep_expired();
                while self.entries.len() >= max {
                    match self.order.pop_oldest() {
                        Some(oldest) => {
                            debug!(key = %oldest, "Evicting least recently used entry");
                            self.entries.remove(&oldest);
                            self.stats.record_eviction();
                        }
                        None => break,
                    }
                }
            }
        }

        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);
        self.entries.insert(key.clone(), CacheEntry::new(value, ttl_ms));
        self.order.promote(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the fresh value for `key`, or `None` if the key is absent
    /// or stale. A stale entry is removed on the spot (lazy eviction), so
    /// a returned value is always fresh at the instant of return.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if !self.remove_if_stale(key) {
            self.stats.record_miss();
            return None;
        }

        let value = self.entries.get(key).map(|e| e.value.clone());
        self.stats.record_hit();
        self.order.promote(key);
        value
    }

    // == Has ==
    /// Whether a fresh entry exists for `key`.
    ///
    /// Applies the same freshness check and lazy eviction as `get` so the
    /// two can never disagree about an entry's existence.
    pub fn has(&mut self, key: &str) -> bool {
        self.remove_if_stale(key)
    }

    // == Delete ==
    /// Removes the entry for `key` unconditionally, stale or not.
    /// Returns whether something was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.order.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Removes all entries. Used for coarse invalidation when the precise
    /// set of affected keys is unknown.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Sweep Expired ==
    /// Removes every stale entry and returns how many were removed.
    /// Memory hygiene only; reads stay correct without it.
    pub fn sweep_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.order.remove(key);
        }

        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    // == Length ==
    /// Current entry count, including stale entries not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Current counters with an up-to-date entry count.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // -- private helpers ---------------------------------------------------

    /// Evicts the entry for `key` if it has gone stale. Returns whether a
    /// fresh entry remains.
    fn remove_if_stale(&mut self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                debug!(key = %key, "Entry expired, evicting lazily");
                self.entries.remove(key);
                self.order.remove(key);
                self.stats.set_total_entries(self.entries.len());
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Test hook: backdates an entry's write timestamp to simulate elapsed
    /// time without sleeping.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &str, ms: u64) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stored_at -= ms;
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TTL: u64 = 300_000;

    #[test]
    fn test_set_then_get_roundtrip() {
        let mut cache = ApiCache::new(TTL);

        cache.set("k".into(), json!({"a": 1}), None);

        assert_eq!(cache.get("k"), Some(json!({"a": 1})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_absent_key() {
        let mut cache = ApiCache::new(TTL);
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_zero_ttl_is_immediately_absent() {
        let mut cache = ApiCache::new(TTL);

        cache.set("k".into(), json!("v"), Some(0));

        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0, "stale entry must be lazily evicted");
    }

    #[test]
    fn test_expiry_after_simulated_elapse() {
        let mut cache = ApiCache::new(TTL);

        cache.set("categories".into(), json!([{"id": 1, "name": "Spices"}]), Some(1000));
        assert_eq!(
            cache.get("categories"),
            Some(json!([{"id": 1, "name": "Spices"}]))
        );

        cache.backdate("categories", 1001);
        assert_eq!(cache.get("categories"), None);
    }

    #[test]
    fn test_has_agrees_with_get() {
        let mut cache = ApiCache::new(TTL);

        cache.set("fresh".into(), json!(1), None);
        cache.set("stale".into(), json!(2), Some(100));
        cache.backdate("stale", 500);

        assert!(cache.has("fresh"));
        assert!(cache.get("fresh").is_some());
        assert!(!cache.has("stale"));
        assert!(cache.get("stale").is_none());
        assert!(!cache.has("absent"));
        assert!(cache.get("absent").is_none());
    }

    #[test]
    fn test_has_evicts_stale_like_get() {
        let mut cache = ApiCache::new(TTL);

        cache.set("k".into(), json!("v"), Some(0));

        assert!(!cache.has("k"));
        assert_eq!(cache.len(), 0, "has() must evict stale entries too");
    }

    #[test]
    fn test_delete_present_and_absent() {
        let mut cache = ApiCache::new(TTL);

        cache.set("k".into(), json!("v"), None);

        assert!(cache.delete("k"));
        assert_eq!(cache.get("k"), None);
        assert!(!cache.delete("k"));
    }

    #[test]
    fn test_delete_removes_stale_entry_unconditionally() {
        let mut cache = ApiCache::new(TTL);

        cache.set("k".into(), json!("v"), Some(0));

        // Still physically present until a read or sweep touches it
        assert_eq!(cache.len(), 1);
        assert!(cache.delete("k"));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut cache = ApiCache::new(TTL);

        cache.set("a".into(), json!(1), None);
        cache.set("b".into(), json!(2), None);
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_len_counts_unswept_stale_entries() {
        let mut cache = ApiCache::new(TTL);

        cache.set("stale".into(), json!(1), Some(0));
        cache.set("fresh".into(), json!(2), None);

        // Informational count, no freshness filtering
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_overwrite_resets_expiry_clock() {
        let mut cache = ApiCache::new(TTL);

        cache.set("k".into(), json!("old"), Some(1000));
        cache.backdate("k", 900);
        cache.set("k".into(), json!("new"), Some(1000));

        // Fresh again from the new write, holding the new value
        assert_eq!(cache.get("k"), Some(json!("new")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let mut cache = ApiCache::new(TTL);

        cache.set("a".into(), json!(1), Some(100));
        cache.set("b".into(), json!(2), Some(100_000));
        cache.backdate("a", 500);
        cache.backdate("b", 500);

        let removed = cache.sweep_expired();

        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b"), Some(json!(2)));
    }

    #[test]
    fn test_sweep_on_fresh_cache_is_noop() {
        let mut cache = ApiCache::new(TTL);

        cache.set("a".into(), json!(1), None);

        assert_eq!(cache.sweep_expired(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_default_ttl_applied() {
        let mut cache = ApiCache::new(0);

        // Default TTL of zero makes unspecified-TTL entries stale at once,
        // while an explicit TTL still overrides it
        cache.set("implicit".into(), json!(1), None);
        cache.set("explicit".into(), json!(2), Some(60_000));

        assert_eq!(cache.get("implicit"), None);
        assert_eq!(cache.get("explicit"), Some(json!(2)));
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let mut cache = ApiCache::with_capacity(TTL, 3);

        cache.set("a".into(), json!(1), None);
        cache.set("b".into(), json!(2), None);
        cache.set("c".into(), json!(3), None);

        // Touch "a" so "b" becomes the LRU candidate
        cache.get("a");
        cache.set("d".into(), json!(4), None);

        assert_eq!(cache.len(), 3);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
        assert!(cache.get("d").is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_capacity_prefers_reclaiming_expired() {
        let mut cache = ApiCache::with_capacity(TTL, 2);

        cache.set("stale".into(), json!(1), Some(0));
        cache.set("live".into(), json!(2), None);
        cache.set("new".into(), json!(3), None);

        // The stale entry is swept, the live one survives
        assert!(cache.get("live").is_some());
        assert!(cache.get("new").is_some());
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_overwrite_never_triggers_eviction() {
        let mut cache = ApiCache::with_capacity(TTL, 2);

        cache.set("a".into(), json!(1), None);
        cache.set("b".into(), json!(2), None);
        cache.set("a".into(), json!(10), None);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(json!(10)));
        assert_eq!(cache.get("b"), Some(json!(2)));
    }

    #[test]
    fn test_stats_accounting() {
        let mut cache = ApiCache::new(TTL);

        cache.set("k".into(), json!("v"), None);
        cache.get("k"); // hit
        cache.get("nope"); // miss
        cache.set("z".into(), json!(0), Some(0));
        cache.get("z"); // lazy expiry counts as a miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hit_rate(), 1.0 / 3.0);
    }
}
