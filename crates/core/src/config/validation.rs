//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `port` or `ttl_secs` is 0
    /// - either timeout is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `upstream_url` is not an absolute http(s) URL
    ///
    /// Returns `ConfigError::Missing` if `host` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Missing { field: "host".into(), hint: "Set PAPERCACHE_HOST".into() });
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid { field: "port".into(), reason: "must be greater than 0".into() });
        }

        if self.ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "ttl_secs".into(), reason: "must be greater than 0".into() });
        }

        Self::validate_timeout("timeout_ms", self.timeout_ms)?;
        Self::validate_timeout("refresh_timeout_ms", self.refresh_timeout_ms)?;

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        match url::Url::parse(&self.upstream_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::Invalid {
                    field: "upstream_url".into(),
                    reason: format!("unsupported scheme: {}", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "upstream_url".into(), reason: e.to_string() });
            }
        }

        if self.refresh_timeout_ms < self.timeout_ms {
            tracing::warn!(
                timeout_ms = self.timeout_ms,
                refresh_timeout_ms = self.refresh_timeout_ms,
                "background refresh timeout is shorter than the live fetch timeout"
            );
        }

        Ok(())
    }

    fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
        if value < MIN_TIMEOUT_MS {
            return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
        }
        if value > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid {
                field: field.into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }
        Ok(())
    }
}
