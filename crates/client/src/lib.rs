//! Upstream client for papercache.
//!
//! This crate talks to the Semantic Scholar paper search endpoint and
//! classifies every answer into a [`FetchOutcome`](papercache_core::FetchOutcome).

pub mod scholar;

pub use scholar::{ScholarClient, ScholarConfig, ScholarError, SearchEnvelope};
