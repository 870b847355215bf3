//! Freshness classification of cache lookups.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use super::entry::CacheEntry;

/// Outcome of classifying a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Present and younger than the TTL.
    Fresh,
    /// Present but at least TTL old.
    Stale,
    /// No entry for the key.
    Absent,
}

/// Fixed-TTL freshness rule.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
    ttl: TimeDelta,
}

impl FreshnessPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX) }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Classify `entry` as of `now`.
    ///
    /// Fresh iff `now - stored_at < ttl`. An entry stamped in the future
    /// counts as fresh.
    pub fn classify(&self, entry: Option<&CacheEntry>, now: DateTime<Utc>) -> Freshness {
        match entry {
            None => Freshness::Absent,
            Some(entry) if now.signed_duration_since(entry.stored_at) < self.ttl => Freshness::Fresh,
            Some(_) => Freshness::Stale,
        }
    }
}
