//! catalog-cache warmup binary
//!
//! Preloads the effectively-static catalog resources into the response
//! cache against a configured backend, then reports cache statistics.
//! Useful as a smoke test of the backend plus a demonstration of the
//! library wiring.

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_cache::{spawn_sweep_task, CachedClient, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info", overridable with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: base_url={}, default_ttl={}ms, max_entries={:?}, sweep_interval={}s",
        config.api_base_url, config.default_ttl_ms, config.max_entries, config.sweep_interval_secs
    );

    let client = CachedClient::new(&config)?;
    let sweep_handle = spawn_sweep_task(
        client.store(),
        Duration::from_secs(config.sweep_interval_secs),
    );

    client.preload_critical().await;

    let stats = client.store().read().await.stats();
    info!(
        "Warmup complete: {} entries cached, {} hits, {} misses",
        stats.total_entries, stats.hits, stats.misses
    );

    sweep_handle.abort();
    Ok(())
}
