//! Unified error type for every cache operation.

use std::fmt::Debug;
use thiserror::Error;

/// Error raised by a cache operation.
///
/// A missing key is never an error: reads report it as an absent value.
/// Every variant carries the original cause as text so observers can
/// report it without holding on to store-specific error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    // ============ Local validation ============
    /// The key is empty.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The requested expiry cannot be applied (zero TTL, past timestamp).
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    // ============ Store errors ============
    /// The store is unreachable or the session is unusable.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// A value could not be encoded, or stored text could not be decoded
    /// into the requested type.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store answered a well-formed request with an error.
    #[error("Store rejected request: {0}")]
    StoreRejection(String),

    // ============ Setup errors ============
    /// Invalid or unreadable settings.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CacheError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "INVALID_KEY",
            Self::InvalidTtl(_) => "INVALID_TTL",
            Self::Connectivity(_) => "CONNECTIVITY_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::StoreRejection(_) => "STORE_REJECTION",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Checks if repeating the same call could succeed.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }

    /// Checks if the error was raised before the store was contacted.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidKey(_) | Self::InvalidTtl(_))
    }

    /// Creates a connectivity error.
    #[must_use]
    pub fn connectivity<T: Into<String>>(message: T) -> Self {
        Self::Connectivity(message.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization<T: Into<String>>(message: T) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a store rejection error.
    #[must_use]
    pub fn store_rejection<T: Into<String>>(message: T) -> Self {
        Self::StoreRejection(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
