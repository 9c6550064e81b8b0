//! Error types for the cached-fetch client
//!
//! Store operations are total functions (an absent key is `None`, not an
//! error); only the network path can fail. Failures propagate verbatim to
//! the caller with no retry, no stale fallback, and no negative caching.

use reqwest::StatusCode;
use thiserror::Error;

// == Fetch Error Enum ==
/// Failure of a `cached_fetch` network round trip.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection failure, timeout, or other transport fault
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("HTTP status {status} from {url}")]
    Status { status: StatusCode, url: String },

    /// The response body was not valid JSON
    #[error("invalid JSON body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// This call was coalesced onto an in-flight request that failed
    #[error("coalesced request failed: {0}")]
    Coalesced(String),
}

// == Result Type Alias ==
/// Convenience Result type for the fetch client.
pub type Result<T> = std::result::Result<T, FetchError>;
