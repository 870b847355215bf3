//! HTTP router for the proxy.
//!
//! `/api/papers` and every path under it go to the resolver; only the query
//! string forms the cache key. Every other path is a static file lookup
//! under the configured directory, with 404 for unknown files.

use std::path::Path;

use axum::{Router, routing::get};
use papercache_core::Resolver;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::papers;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
}

/// Build the application router.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let api = Router::new()
        .route("/api/papers", get(papers::search))
        .route("/api/papers/", get(papers::search))
        .route("/api/papers/*rest", get(papers::search))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state);

    api.fallback_service(ServeDir::new(static_dir)).layer(TraceLayer::new_for_http())
}
