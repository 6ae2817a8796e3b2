//! Store client seam for raw cache operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use objcache_core::CacheResult;
use shaku::Interface;
use std::time::Duration;

/// Remaining lifetime of a key as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist.
    Missing,
    /// The key exists without an expiry.
    Persistent,
    /// The key expires after the given duration.
    Expiring(Duration),
}

impl KeyTtl {
    /// Returns the remaining lifetime, collapsing missing and persistent keys.
    #[must_use]
    pub const fn remaining(self) -> Option<Duration> {
        match self {
            Self::Expiring(remaining) => Some(remaining),
            Self::Missing | Self::Persistent => None,
        }
    }
}

/// Connection to a remote key-value store.
///
/// Works on raw text so the trait stays dyn-compatible; typed values are
/// encoded and decoded by [`ObjectCache`](super::ObjectCache). Each method
/// maps to exactly one store command.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Writes `payload` under `key`.
    ///
    /// With `ttl` the entry expires after it; without, any previous expiry
    /// is cleared and the entry persists.
    async fn write(&self, key: &str, payload: &str, ttl: Option<Duration>) -> CacheResult<()>;

    /// Reads the raw payload for `key`.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn read(&self, key: &str) -> CacheResult<Option<String>>;

    /// Removes `key`.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn remove(&self, key: &str) -> CacheResult<bool>;

    /// Checks if a key exists.
    async fn contains(&self, key: &str) -> CacheResult<bool>;

    /// Sets or replaces the relative expiry of an existing key.
    ///
    /// Returns `false` if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool>;

    /// Sets or replaces the absolute expiry of an existing key.
    ///
    /// Returns `false` if the key does not exist.
    async fn expire_at(&self, key: &str, at: DateTime<Utc>) -> CacheResult<bool>;

    /// Reports the remaining lifetime of `key`.
    async fn ttl(&self, key: &str) -> CacheResult<KeyTtl>;

    /// Releases the session. Later calls fail with a connectivity error.
    fn close(&self);

    /// Check if the store has a usable session.
    fn is_enabled(&self) -> bool;
}
