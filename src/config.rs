//! Configuration Module
//!
//! Client configuration loaded from environment variables with defaults.

use std::env;

/// Cached-fetch client configuration.
///
/// All values can be configured via environment variables with sensible
/// defaults matching the catalog backend's development setup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalog REST backend
    pub api_base_url: String,
    /// Default TTL in milliseconds for entries without an explicit TTL
    pub default_ttl_ms: u64,
    /// Maximum cache entries; None = unbounded
    pub max_entries: Option<usize>,
    /// Background sweep interval in seconds
    pub sweep_interval_secs: u64,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Backend base URL (default: http://127.0.0.1:8000)
    /// - `DEFAULT_TTL_MS` - Default entry TTL in ms (default: 300000)
    /// - `MAX_ENTRIES` - Cache capacity bound (default: unbounded)
    /// - `SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 60)
    /// - `REQUEST_TIMEOUT_MS` - HTTP timeout in ms (default: 15000)
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::cache::DEFAULT_TTL_MS),
            max_entries: env::var("MAX_ENTRIES").ok().and_then(|v| v.parse().ok()),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15_000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            default_ttl_ms: crate::cache::DEFAULT_TTL_MS,
            max_entries: None,
            sweep_interval_secs: 60,
            request_timeout_ms: 15_000,
        }
    }
}
