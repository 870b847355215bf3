//! papercache server entry point.
//!
//! Boots the caching proxy: loads configuration, opens the cache document,
//! builds the upstream client and serves the API plus static assets over HTTP.
//! Logging goes to stderr as JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use papercache_client::{ScholarClient, ScholarConfig};
use papercache_core::{AppConfig, CacheStore, Resolver, ResolverConfig};
use tracing_subscriber::EnvFilter;

mod handler;
mod papers;

use handler::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let store = Arc::new(CacheStore::new(&config.cache_path));
    let client = ScholarClient::new(ScholarConfig::from(&config))?;
    let resolver = Resolver::new(store, Arc::new(client), ResolverConfig::from(&config));

    let app = handler::router(AppState { resolver }, &config.static_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        cache = %config.cache_path.display(),
        static_dir = %config.static_dir.display(),
        ttl_secs = config.ttl_secs,
        "Starting papercache server"
    );

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
