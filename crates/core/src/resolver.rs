//! Request resolution: fresh hit, stale-while-revalidate, or live fetch.
//!
//! For one request key the resolver loads the cache once, classifies the
//! entry once, and takes exactly one path:
//!
//! - **Fresh**: serve the stored payload. No network.
//! - **Stale**: serve the stored payload, then refresh it in a detached
//!   task. The caller never waits on the refresh and never sees its result.
//! - **Miss**: fetch synchronously, cache only a successful result, and
//!   answer with whatever the upstream produced.
//!
//! At most one upstream call is made per resolution. Nothing is retried; the
//! next stale hit is the retry.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::cache::{CacheEntry, CacheStore, Freshness, FreshnessPolicy};
use crate::config::AppConfig;
use crate::upstream::{FetchOutcome, Upstream};

/// Which path a resolution took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    Fresh,
    Stale,
    Miss,
}

/// Response produced for one request: HTTP status plus a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub status: u16,
    pub body: String,
    pub path: ResolutionPath,
}

impl Resolution {
    fn new(status: u16, body: String, path: ResolutionPath) -> Self {
        Self { status, body, path }
    }
}

/// Timing knobs for the resolver.
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    pub ttl: Duration,
    /// Bound on the synchronous fetch of a miss.
    pub live_timeout: Duration,
    /// Bound on a background refresh.
    pub refresh_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(86_400),
            live_timeout: Duration::from_secs(5),
            refresh_timeout: Duration::from_secs(15),
        }
    }
}

impl From<&AppConfig> for ResolverConfig {
    fn from(config: &AppConfig) -> Self {
        Self { ttl: config.ttl(), live_timeout: config.timeout(), refresh_timeout: config.refresh_timeout() }
    }
}

/// Resolves request keys against the cache and the upstream.
///
/// Cheap to clone; clones share the store and the upstream client.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<CacheStore>,
    upstream: Arc<dyn Upstream>,
    policy: FreshnessPolicy,
    live_timeout: Duration,
    refresh_timeout: Duration,
}

impl Resolver {
    pub fn new(store: Arc<CacheStore>, upstream: Arc<dyn Upstream>, config: ResolverConfig) -> Self {
        Self {
            store,
            upstream,
            policy: FreshnessPolicy::new(config.ttl),
            live_timeout: config.live_timeout,
            refresh_timeout: config.refresh_timeout,
        }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Resolve one request key.
    pub async fn resolve(&self, key: &str) -> Resolution {
        // No lock: a stale read costs at most a redundant refresh.
        let snapshot = self.store.load().await;
        let entry = CacheStore::get(&snapshot, key);

        match (self.policy.classify(entry, Utc::now()), entry) {
            (Freshness::Fresh, Some(entry)) => {
                tracing::debug!(key = %key, "cache hit (fresh)");
                Resolution::new(200, entry.payload.clone(), ResolutionPath::Fresh)
            }
            (Freshness::Stale, Some(entry)) => {
                tracing::debug!(key = %key, stored_at = %entry.stored_at, "cache hit (stale), refreshing");
                self.spawn_refresh(key);
                Resolution::new(200, entry.payload.clone(), ResolutionPath::Stale)
            }
            _ => self.fetch_live(key).await,
        }
    }

    fn spawn_refresh(&self, key: &str) {
        let resolver = self.clone();
        let key = key.to_owned();
        // Detached: the handle is dropped and the outcome only logged.
        tokio::spawn(async move { resolver.refresh(&key).await });
    }

    async fn refresh(&self, key: &str) {
        match self.upstream.fetch(key, self.refresh_timeout).await {
            FetchOutcome::Success(payload) => {
                if self.store.record(key, CacheEntry::now(payload)).await.is_ok() {
                    tracing::info!(key = %key, "cache refreshed");
                }
            }
            FetchOutcome::Failed(e) => {
                tracing::debug!(key = %key, error = %e, "background refresh failed (non-fatal)");
            }
            other => {
                tracing::debug!(key = %key, outcome = other.kind(), "background refresh discarded");
            }
        }
    }

    async fn fetch_live(&self, key: &str) -> Resolution {
        let outcome = self.upstream.fetch(key, self.live_timeout).await;
        tracing::debug!(key = %key, outcome = outcome.kind(), "cache miss, fetched live");

        match outcome {
            FetchOutcome::Success(payload) => {
                if let Err(e) = self.store.record(key, CacheEntry::now(payload.as_str())).await {
                    tracing::debug!(key = %key, error = %e, "live result served uncached");
                }
                Resolution::new(200, payload, ResolutionPath::Miss)
            }
            FetchOutcome::RateLimited(body) => Resolution::new(429, body, ResolutionPath::Miss),
            FetchOutcome::Unrecognized(body) => Resolution::new(200, body, ResolutionPath::Miss),
            FetchOutcome::Rejected { status, body } => Resolution::new(status, body, ResolutionPath::Miss),
            FetchOutcome::Failed(e) => {
                tracing::warn!(key = %key, error = %e, "live fetch failed");
                Resolution::new(502, e.to_json_body(), ResolutionPath::Miss)
            }
        }
    }
}
