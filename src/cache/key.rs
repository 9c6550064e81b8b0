//! Cache Key Module
//!
//! Deterministic request-key derivation from request shape.

use reqwest::Method;
use serde_json::Value;

// == Derive Key ==
/// Builds the cache key for a request as `"METHOD:url:body"`.
///
/// Equal `(method, url, body)` inputs always yield equal keys. Any
/// differing component yields a different key. The body is serialized for
/// every method, GET included, so all methods share one derivation rule.
/// A missing body serializes to the empty string. Callers wanting a
/// never-reused key (cache busting) pass an explicit key instead.
pub fn derive_key(method: &Method, url: &str, body: Option<&Value>) -> String {
    let body = body.map(|b| b.to_string()).unwrap_or_default();
    format!("{}:{}:{}", method.as_str(), url, body)
}
