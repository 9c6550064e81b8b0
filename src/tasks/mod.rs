//! Background Tasks Module
//!
//! Periodic maintenance running alongside the cache.
//!
//! # Tasks
//! - TTL sweep: removes expired entries at a configured interval

mod cleanup;

pub use cleanup::spawn_sweep_task;
