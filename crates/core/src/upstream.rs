//! The seam between the resolver and the upstream search API.

use std::time::Duration;

use async_trait::async_trait;

use crate::Error;

/// Classified result of one upstream call.
///
/// Every failure is expressed here; implementations of [`Upstream`] never
/// return `Result` and never panic on network errors.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx JSON object with a non-null `data` field (an empty list counts).
    Success(String),
    /// Throttled: HTTP 429, or a 2xx message-only body without `data`.
    RateLimited(String),
    /// 2xx JSON object with neither `data` nor `message`.
    Unrecognized(String),
    /// Any other non-2xx response.
    Rejected { status: u16, body: String },
    /// Timeout, transport failure or unparseable body.
    Failed(Error),
}

impl FetchOutcome {
    /// Only successful results may enter the cache.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchOutcome::Success(_) => "success",
            FetchOutcome::RateLimited(_) => "rate_limited",
            FetchOutcome::Unrecognized(_) => "unrecognized",
            FetchOutcome::Rejected { .. } => "rejected",
            FetchOutcome::Failed(_) => "failed",
        }
    }
}

/// One call to the upstream search API.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetch results for the raw query string, giving up after `timeout`.
    async fn fetch(&self, query: &str, timeout: Duration) -> FetchOutcome;
}
