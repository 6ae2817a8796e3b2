//! Settings loader with layered sources.

use crate::{format_validation_errors, CacheSettings, SettingsValidator};
use config::{Config, ConfigError, Environment, File};
use objcache_core::CacheError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Environment variable selecting the environment-specific settings file.
pub const ENVIRONMENT_VAR: &str = "OBJCACHE_ENVIRONMENT";

/// Prefix for environment variable overrides (`OBJCACHE__REDIS__URL`, ...).
pub const ENV_PREFIX: &str = "OBJCACHE";

/// Settings loader with runtime refresh support.
#[derive(Clone)]
pub struct SettingsLoader {
    settings: Arc<RwLock<CacheSettings>>,
    config_dir: PathBuf,
}

impl SettingsLoader {
    /// Creates a new settings loader.
    ///
    /// Settings are loaded from multiple sources in order:
    /// 1. `{config_dir}/default.toml` - Default values
    /// 2. `{config_dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{config_dir}/local.toml` - Local overrides
    /// 4. Environment variables with `OBJCACHE__` prefix
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let config_dir = config_dir.into();
        let settings = Self::load_settings(&config_dir)?;

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            config_dir,
        })
    }

    /// Loads settings from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, CacheError> {
        Self::new("./config")
    }

    /// Returns the current settings.
    pub async fn get(&self) -> CacheSettings {
        self.settings.read().await.clone()
    }

    /// Reloads the settings from disk.
    ///
    /// On failure the previous settings stay in place.
    pub async fn reload(&self) -> Result<(), CacheError> {
        let new_settings = Self::load_settings(&self.config_dir)?;
        let mut settings = self.settings.write().await;
        *settings = new_settings;
        info!("Cache settings reloaded successfully");
        Ok(())
    }

    /// Loads settings from the specified directory.
    fn load_settings(config_dir: &Path) -> Result<CacheSettings, CacheError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        info!("Loading cache settings for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = config_dir.join(format!("{}.toml", name));
            if path.exists() {
                debug!("Loading settings from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings: CacheSettings = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error_to_cache_error)?;

        SettingsValidator::validate(&settings)
            .map_err(|errors| CacheError::Configuration(format_validation_errors(&errors)))?;

        Ok(settings)
    }
}

fn config_error_to_cache_error(err: ConfigError) -> CacheError {
    CacheError::Configuration(err.to_string())
}
