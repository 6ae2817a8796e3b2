//! Cache key generators for consistent key naming.
//!
//! Keys follow `namespace:identifier` so object kinds sharing one store do
//! not collide, optionally under an application-wide prefix.

use objcache_config::KeySettings;
use std::fmt::Display;

/// Separator between key segments.
pub const KEY_SEPARATOR: char = ':';

/// Builds `[prefix:]namespace:identifier` keys.
#[derive(Debug, Clone, Default)]
pub struct KeyBuilder {
    prefix: Option<String>,
}

impl KeyBuilder {
    /// Create a new key builder with an optional prefix.
    #[must_use]
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Create a key builder from settings.
    #[must_use]
    pub fn from_settings(settings: &KeySettings) -> Self {
        Self::new(settings.prefix.clone())
    }

    /// Key for one object of the given kind, e.g. `product:1`.
    #[must_use]
    pub fn key(&self, namespace: &str, id: impl Display) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{KEY_SEPARATOR}{namespace}{KEY_SEPARATOR}{id}"),
            None => format!("{namespace}{KEY_SEPARATOR}{id}"),
        }
    }

    /// The configured prefix.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}
