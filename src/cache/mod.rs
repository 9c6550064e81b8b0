//! Cache Module
//!
//! In-memory response caching with per-entry TTL expiry, lazy eviction,
//! and an optional LRU capacity bound.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::derive_key;
pub use lru::AccessOrder;
pub use stats::CacheStats;
pub use store::ApiCache;

// == Public Constants ==
/// Default TTL for entries stored without an explicit TTL: 5 minutes.
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;
