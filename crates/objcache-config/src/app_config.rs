//! Settings structures.

use objcache_core::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Redis connection settings.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Key naming settings.
    #[serde(default)]
    pub keys: KeySettings,

    /// Logging and metrics settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL.
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Connection and checkout timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Enable Redis (can be disabled for local development).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl RedisConfig {
    /// Creates an enabled configuration for the given URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            pool_size: default_pool_size(),
            connect_timeout_secs: default_connect_timeout(),
            enabled: default_enabled(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_pool_size() -> usize {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_enabled() -> bool {
    true
}

/// Key naming settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeySettings {
    /// Prefix prepended to every generated key, e.g. `"shop"` gives
    /// `"shop:product:1"`.
    #[serde(default)]
    pub prefix: Option<String>,
}
