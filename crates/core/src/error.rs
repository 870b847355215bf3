//! Unified error types for papercache.
//!
//! None of these are fatal to the serving process: cache failures degrade to
//! an empty (or stale) cache and upstream failures degrade to a structured
//! error body for the one caller that triggered them.

use std::path::PathBuf;

use serde_json::json;

/// Unified error types for the papercache proxy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The cache document could not be read or parsed.
    #[error("CACHE_READ_FAILED: {path}: {reason}")]
    CacheRead { path: PathBuf, reason: String },

    /// The cache document could not be written.
    #[error("CACHE_WRITE_FAILED: {path}: {reason}")]
    CacheWrite { path: PathBuf, reason: String },

    /// The upstream call did not finish within its timeout.
    #[error("UPSTREAM_TIMEOUT: {0}")]
    UpstreamTimeout(String),

    /// Connection, TLS or body read failure talking to the upstream.
    #[error("UPSTREAM_TRANSPORT: {0}")]
    UpstreamTransport(String),

    /// The upstream answered 2xx with a body that is not a JSON object.
    #[error("UPSTREAM_PARSE: {0}")]
    UpstreamParse(String),
}

impl Error {
    /// Stable kind code, the prefix of the `Display` text.
    pub fn code(&self) -> &'static str {
        match self {
            Error::CacheRead { .. } => "CACHE_READ_FAILED",
            Error::CacheWrite { .. } => "CACHE_WRITE_FAILED",
            Error::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            Error::UpstreamTransport(_) => "UPSTREAM_TRANSPORT",
            Error::UpstreamParse(_) => "UPSTREAM_PARSE",
        }
    }

    /// Render the error as the JSON body returned to a client.
    ///
    /// The shape mirrors an upstream failure response: a `message` field and
    /// an explicit `data: null`, plus the kind code under `error`.
    pub fn to_json_body(&self) -> String {
        json!({ "error": self.code(), "message": self.to_string(), "data": null }).to_string()
    }
}
