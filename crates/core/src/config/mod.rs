//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PAPERCACHE_*)
//! 2. TOML config file (if PAPERCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PAPERCACHE_*)
/// 2. TOML config file (if PAPERCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address to bind the proxy on.
    ///
    /// Set via PAPERCACHE_HOST. Defaults to IPv4 loopback so clients never
    /// stall on an IPv6 attempt first.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the proxy on.
    ///
    /// Set via PAPERCACHE_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the JSON cache document.
    ///
    /// Set via PAPERCACHE_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Directory served for every non-API path.
    ///
    /// Set via PAPERCACHE_STATIC_DIR environment variable.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Upstream paper search endpoint; the inbound query string is appended.
    ///
    /// Set via PAPERCACHE_UPSTREAM_URL environment variable.
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Optional upstream API key, sent as `x-api-key`.
    ///
    /// Set via PAPERCACHE_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// User-Agent string for upstream requests.
    ///
    /// Set via PAPERCACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Age in seconds after which a cache entry is stale.
    ///
    /// Set via PAPERCACHE_TTL_SECS environment variable.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Timeout in milliseconds for the synchronous fetch on a cache miss.
    ///
    /// Set via PAPERCACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Timeout in milliseconds for background refreshes.
    ///
    /// Set via PAPERCACHE_REFRESH_TIMEOUT_MS environment variable.
    #[serde(default = "default_refresh_timeout_ms")]
    pub refresh_timeout_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8000
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./paper_cache.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

fn default_upstream_url() -> String {
    "https://api.semanticscholar.org/graph/v1/paper/search".into()
}

fn default_user_agent() -> String {
    "papercache/0.1".into()
}

fn default_ttl_secs() -> u64 {
    86_400 // 24h
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_refresh_timeout_ms() -> u64 {
    15_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cache_path: default_cache_path(),
            static_dir: default_static_dir(),
            upstream_url: default_upstream_url(),
            api_key: None,
            user_agent: default_user_agent(),
            ttl_secs: default_ttl_secs(),
            timeout_ms: default_timeout_ms(),
            refresh_timeout_ms: default_refresh_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Freshness TTL as Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Miss-path timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Background refresh timeout as Duration.
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PAPERCACHE_`
    /// 2. TOML file from `PAPERCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PAPERCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PAPERCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
