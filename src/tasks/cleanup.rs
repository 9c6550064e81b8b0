//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries so
//! never-re-read keys do not accumulate. Memory hygiene only: reads
//! enforce freshness lazily and stay correct with the sweep disabled.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ApiCache;

/// Spawns a task that sweeps expired entries every `interval`.
///
/// The returned handle is used to abort the task on shutdown.
pub fn spawn_sweep_task(cache: Arc<RwLock<ApiCache>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting TTL sweep task with interval {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache = cache.write().await;
                cache.sweep_expired()
            };

            if removed > 0 {
                info!("TTL sweep removed {} expired entries", removed);
            } else {
                debug!("TTL sweep found no expired entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let cache = Arc::new(RwLock::new(ApiCache::new(300_000)));

        {
            let mut cache = cache.write().await;
            cache.set("short".into(), json!("v"), Some(50));
        }

        let handle = spawn_sweep_task(Arc::clone(&cache), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(300)).await;

        // len() counts unswept stale entries, so reaching zero proves the
        // sweep ran rather than a lazy read doing the eviction
        assert_eq!(cache.read().await.len(), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_fresh_entries() {
        let cache = Arc::new(RwLock::new(ApiCache::new(300_000)));

        {
            let mut cache = cache.write().await;
            cache.set("long".into(), json!("v"), Some(60_000));
        }

        let handle = spawn_sweep_task(Arc::clone(&cache), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.write().await.get("long"), Some(json!("v")));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = Arc::new(RwLock::new(ApiCache::new(300_000)));

        let handle = spawn_sweep_task(cache, Duration::from_millis(50));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished());
    }
}
