//! Client Module
//!
//! The read-through cached-fetch client over the response store.

mod fetch;

pub use fetch::{CachedClient, FetchOptions};
