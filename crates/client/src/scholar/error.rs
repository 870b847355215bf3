//! Scholar client error types.

use std::sync::Arc;
use std::time::Duration;

/// Errors from the Semantic Scholar client.
///
/// These never cross the [`Upstream`](papercache_core::Upstream) boundary
/// as errors; they are folded into `FetchOutcome::Failed`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScholarError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// Request timeout.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ScholarError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() { ScholarError::Timeout(timeout) } else { ScholarError::Network(Arc::new(err)) }
    }
}

impl From<ScholarError> for papercache_core::Error {
    fn from(err: ScholarError) -> Self {
        use papercache_core::Error;

        match err {
            ScholarError::Timeout(_) => Error::UpstreamTimeout(err.to_string()),
            ScholarError::Parse(msg) => Error::UpstreamParse(msg),
            ScholarError::Build(_) | ScholarError::Network(_) => Error::UpstreamTransport(err.to_string()),
        }
    }
}
