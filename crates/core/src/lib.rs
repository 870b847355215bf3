//! Core types and shared functionality for papercache.
//!
//! This crate provides:
//! - The JSON-document cache store and its freshness policy
//! - The upstream seam and fetch outcome classification
//! - The request resolver (fresh / stale-while-revalidate / live fetch)
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod resolver;
pub mod upstream;

pub use cache::{CacheEntry, CacheMap, CacheStore, Freshness, FreshnessPolicy};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use resolver::{Resolution, ResolutionPath, Resolver, ResolverConfig};
pub use upstream::{FetchOutcome, Upstream};
