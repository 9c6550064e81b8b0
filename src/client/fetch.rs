//! Cached Fetch Client
//!
//! Read-through composition of the response store with a reqwest client:
//! one call that serves from cache or falls through to the network, with
//! single-flight coalescing of concurrent identical GET misses.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

use crate::cache::{derive_key, ApiCache};
use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::policy::ResourceClass;

/// Result shape broadcast to coalesced waiters. Errors travel as their
/// display string because `FetchError` is not `Clone`.
type SharedResult = std::result::Result<Value, String>;

// == Fetch Options ==
/// Request shape for `cached_fetch`. The default is a bare GET, the only
/// method that ever reads or writes the cache.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// HTTP method; `Method::default()` is GET
    pub method: Method,
    /// Extra request headers (auth tokens etc.)
    pub headers: HeaderMap,
    /// JSON request body, also part of the derived cache key
    pub body: Option<Value>,
}

// == Cached Client ==
/// Read-through HTTP client over a shared [`ApiCache`].
///
/// Cloning is cheap; clones share the same store and in-flight table.
#[derive(Debug, Clone)]
pub struct CachedClient {
    http: reqwest::Client,
    store: Arc<RwLock<ApiCache>>,
    /// Keys with a network request currently in flight, mapped to the
    /// channel its result will be broadcast on. Guarded by a synchronous
    /// mutex, never held across an await.
    in_flight: Arc<InFlightMap>,
    base_url: String,
}

type InFlightMap = Mutex<HashMap<String, broadcast::Sender<SharedResult>>>;

/// Removes an in-flight entry when the leader finishes or is cancelled.
///
/// A cancelled leader drops this guard and its own sender handle. With
/// the map's sender removed too, the channel closes, and waiters wake
/// with a recv error and retry instead of hanging.
struct InFlightGuard {
    map: Arc<InFlightMap>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock_in_flight(&self.map).remove(&self.key);
    }
}

fn lock_in_flight(
    map: &InFlightMap,
) -> std::sync::MutexGuard<'_, HashMap<String, broadcast::Sender<SharedResult>>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CachedClient {
    // == Constructor ==
    /// Builds a client and its store from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let store = match config.max_entries {
            Some(max) => ApiCache::with_capacity(config.default_ttl_ms, max),
            None => ApiCache::new(config.default_ttl_ms),
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            store: Arc::new(RwLock::new(store)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The shared store, for direct invalidation and for the sweep task.
    pub fn store(&self) -> Arc<RwLock<ApiCache>> {
        Arc::clone(&self.store)
    }

    // == Cached Fetch ==
    /// Fetches `path` (joined onto the configured base URL unless already
    /// absolute), serving cacheable requests from the store when fresh.
    ///
    /// The effective key is `cache_key` if given, else derived from
    /// `(method, url, body)`. Only GET requests consult or populate the
    /// store. Every other method always goes to the network and is never
    /// cached, so mutations cannot be short-circuited by stale reads.
    ///
    /// A store write happens only after a verified 2xx response with a
    /// valid JSON body. Failures propagate verbatim and leave the store
    /// untouched. Concurrent misses on one key are coalesced onto a
    /// single network request.
    pub async fn cached_fetch(
        &self,
        path: &str,
        options: FetchOptions,
        cache_key: Option<String>,
        ttl_ms: Option<u64>,
    ) -> Result<Value> {
        let url = self.url_for(path);
        let key = cache_key
            .unwrap_or_else(|| derive_key(&options.method, &url, options.body.as_ref()));

        if options.method != Method::GET {
            return self.fetch_network(&url, &options).await;
        }

        loop {
            if let Some(value) = self.store.write().await.get(&key) {
                debug!(key = %key, "Cache hit");
                return Ok(value);
            }

            // Join the in-flight request for this key, or become its leader.
            // The lock is scoped to this block so the guard is provably not
            // held across the awaits below.
            let joined = {
                let mut in_flight = lock_in_flight(&self.in_flight);
                match in_flight.get(&key) {
                    Some(tx) => Ok(tx.subscribe()),
                    None => {
                        let (tx, _) = broadcast::channel(1);
                        in_flight.insert(key.clone(), tx.clone());
                        Err(tx)
                    }
                }
            };
            let mut rx = match joined {
                Ok(rx) => rx,
                Err(tx) => {
                    return self.fetch_as_leader(&url, &options, &key, ttl_ms, tx).await;
                }
            };

            debug!(key = %key, "Coalescing onto in-flight request");
            match rx.recv().await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(message)) => return Err(FetchError::Coalesced(message)),
                // The leader went away without resolving, either cancelled
                // or finished after this subscription. Start over: the
                // cache may have been populated in the meantime.
                Err(_) => continue,
            }
        }
    }

    /// Convenience wrapper using a resource class's canonical key and
    /// policy TTL.
    pub async fn fetch_class(&self, class: ResourceClass, path: &str) -> Result<Value> {
        self.cached_fetch(
            path,
            FetchOptions::default(),
            Some(class.name().to_string()),
            Some(class.ttl_ms()),
        )
        .await
    }

    // == Invalidation ==
    /// Drops the entry for `key` so the next read is forced fresh. Returns
    /// whether an entry was removed. Callers use this after mutating the
    /// backend resource a cached list depends on.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    /// Drops every cached entry.
    pub async fn clear_cache(&self) {
        self.store.write().await.clear();
    }

    // == Preload ==
    /// Warms the effectively-static resources (categories, subcategories)
    /// with their policy TTLs. Failures are logged, not propagated: a cold
    /// cache is a performance problem, not a correctness one.
    pub async fn preload_critical(&self) {
        let (categories, subcategories) = tokio::join!(
            self.fetch_class(ResourceClass::Categories, "/categories/"),
            self.fetch_class(ResourceClass::Subcategories, "/subcategories/"),
        );

        for (class, result) in [("categories", categories), ("subcategories", subcategories)] {
            if let Err(error) = result {
                warn!(class = %class, %error, "Failed to preload critical resource");
            }
        }
    }

    // -- private helpers ---------------------------------------------------

    /// Performs the network request as the sole in-flight leader for
    /// `key`. On success the store is populated before waiters wake. The
    /// in-flight entry is cleared by the guard however this future ends,
    /// including cancellation, so a key can never stay wedged behind a
    /// leader that no longer exists.
    async fn fetch_as_leader(
        &self,
        url: &str,
        options: &FetchOptions,
        key: &str,
        ttl_ms: Option<u64>,
        tx: broadcast::Sender<SharedResult>,
    ) -> Result<Value> {
        let _guard = InFlightGuard {
            map: Arc::clone(&self.in_flight),
            key: key.to_string(),
        };

        let result = self.fetch_network(url, options).await;

        if let Ok(value) = &result {
            self.store
                .write()
                .await
                .set(key.to_string(), value.clone(), ttl_ms);
        }

        // The store write happens before waiters are resolved, so anyone
        // who misses the broadcast finds the cache populated instead.
        let shared = match &result {
            Ok(value) => Ok(value.clone()),
            Err(error) => Err(error.to_string()),
        };
        let _ = tx.send(shared);

        result
    }

    /// One bare network round trip: non-2xx and undecodable bodies are
    /// failures, and nothing here writes to the store.
    async fn fetch_network(&self, url: &str, options: &FetchOptions) -> Result<Value> {
        debug!(method = %options.method, url = %url, "Fetching from network");

        let mut request = self
            .http
            .request(options.method.clone(), url)
            .headers(options.headers.clone());
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        response.json::<Value>().await.map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}
