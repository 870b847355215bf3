//! JSON-document cache for upstream search responses.
//!
//! The whole cache is a single serialized mapping from request key to a
//! timestamped raw payload. It supports:
//!
//! - Self-healing loads (missing or corrupt documents read as empty)
//! - Atomic saves (temp file + rename, never a partial document)
//! - Serialized read-modify-write cycles across concurrent writers
//! - A pure freshness classification driven by a fixed TTL

pub mod entry;
pub mod freshness;
pub mod key;
pub mod store;

pub use crate::Error;

pub use entry::{CacheEntry, CacheMap};
pub use freshness::{Freshness, FreshnessPolicy};
pub use key::cache_key;
pub use store::CacheStore;
