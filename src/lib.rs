//! catalog-cache - Client-side response caching for a catalog REST API
//!
//! An in-memory TTL response store plus a read-through fetch client that
//! serves repeat GET requests from cache, coalesces concurrent identical
//! misses, and ages entries out lazily and via a periodic sweep.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod policy;
pub mod tasks;

pub use cache::{derive_key, ApiCache, CacheStats, DEFAULT_TTL_MS};
pub use client::{CachedClient, FetchOptions};
pub use config::Config;
pub use error::{FetchError, Result};
pub use policy::ResourceClass;
pub use tasks::spawn_sweep_task;
