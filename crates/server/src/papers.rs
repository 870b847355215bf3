//! `GET /api/papers` implementation.
//!
//! Translates the raw query string into a cache key, hands it to the
//! resolver and writes the resolution back as a JSON response.

use axum::{
    extract::{RawQuery, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use papercache_core::{Resolution, ResolutionPath, cache::cache_key};

use crate::handler::AppState;

/// Debug header naming the path a response took.
pub const X_CACHE: &str = "x-cache";

/// Implementation of the paper search proxy.
pub async fn search(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let key = cache_key(query.as_deref());
    let resolution = state.resolver.resolve(&key).await;
    json_response(resolution)
}

fn json_response(resolution: Resolution) -> Response {
    let status = StatusCode::from_u16(resolution.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let cache = match resolution.path {
        ResolutionPath::Fresh => "fresh",
        ResolutionPath::Stale => "stale",
        ResolutionPath::Miss => "miss",
    };

    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::HeaderName::from_static(X_CACHE), HeaderValue::from_static(cache)),
        ],
        resolution.body,
    )
        .into_response()
}
