//! Settings validation.
//!
//! Fails fast on settings the cache cannot work with, before any
//! connection attempt is made.

use crate::CacheSettings;
use std::fmt;
use url::Url;

/// Settings validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Pool must hold at least one connection.
    EmptyPool,
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: usize, maximum: usize },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Key prefix is set but empty, or contains whitespace.
    InvalidKeyPrefix { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::EmptyPool => write!(f, "Pool size must be at least 1"),
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::InvalidKeyPrefix { value } => {
                write!(f, "Invalid key prefix '{}': must be non-empty without whitespace", value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Settings validator.
pub struct SettingsValidator;

impl SettingsValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: usize = 1024;
    /// Accepted Redis URL schemes.
    const REDIS_SCHEMES: &'static [&'static str] = &["redis", "rediss", "redis+unix", "unix"];

    /// Validates all settings.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(settings: &CacheSettings) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_redis(&settings.redis, &mut errors);
        Self::validate_keys(&settings.keys, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates Redis configuration.
    fn validate_redis(config: &crate::RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        match Url::parse(&config.url) {
            Ok(url) if Self::REDIS_SCHEMES.contains(&url.scheme()) => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: format!(
                    "unsupported scheme '{}' (expected one of {})",
                    url.scheme(),
                    Self::REDIS_SCHEMES.join(", ")
                ),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: e.to_string(),
            }),
        }

        if config.pool_size == 0 {
            errors.push(ConfigValidationError::EmptyPool);
        } else if config.pool_size > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "redis.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    /// Validates key naming settings.
    fn validate_keys(config: &crate::KeySettings, errors: &mut Vec<ConfigValidationError>) {
        if let Some(prefix) = &config.prefix {
            if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
                errors.push(ConfigValidationError::InvalidKeyPrefix {
                    value: prefix.clone(),
                });
            }
        }
    }
}

/// Formats validation errors for display.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}
