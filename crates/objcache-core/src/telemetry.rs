//! Tracing initialisation.
//!
//! The cache reports its diagnostics through `tracing`; this module installs
//! a subscriber for applications that do not bring their own.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::CacheResult;
use serde::{Deserialize, Serialize};

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directives used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// Record operation counters and latencies through `metrics`.
    #[serde(default)]
    pub metrics: bool,
}

fn default_filter() -> String {
    "info,objcache=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
            metrics: false,
        }
    }
}

/// Installs a global tracing subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, so repeated
/// calls (tests, embedding applications) are harmless.
#[cfg(feature = "telemetry")]
pub fn init_tracing(config: &TelemetryConfig) -> CacheResult<bool> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| crate::CacheError::configuration(format!("Invalid log filter: {}", e)))?;

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!(filter = %config.filter, json = config.json, "Tracing initialized");
    }

    Ok(installed)
}

/// Placeholder for when telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_config: &TelemetryConfig) -> CacheResult<bool> {
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.filter, "info,objcache=debug");
        assert!(!config.json);
        assert!(!config.metrics);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: TelemetryConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert!(config.json);
        assert_eq!(config.filter, "info,objcache=debug");
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn test_init_tracing_is_repeatable() {
        let config = TelemetryConfig::default();
        assert!(init_tracing(&config).is_ok());
        assert_eq!(init_tracing(&config).ok(), Some(false));
    }
}
