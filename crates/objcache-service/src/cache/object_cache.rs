//! Typed object cache over a [`CacheStore`].

use super::codec;
use super::metrics::MetricsObserver;
use super::observer::{CacheEvent, CacheObserver, CacheOperation, EventStatus, FanoutObserver, TracingObserver};
use super::{CacheStore, KeyTtl, RedisCacheStore};
use chrono::{DateTime, Utc};
use objcache_config::{CacheSettings, RedisConfig};
use objcache_core::{CacheError, CacheOutcome, CacheResult};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Stores and retrieves serializable values by key.
///
/// Every operation has two forms:
/// - `try_*` (and [`fetch`](Self::fetch) for reads) reports failures as
///   [`CacheError`] and keeps a missing key apart from a failed call;
/// - the short form (`set`, `get`, `delete`, ...) collapses failures into
///   `false` / `None`.
///
/// Both forms report every completed call, failures included, to the
/// configured [`CacheObserver`].
///
/// A cache that owns its store releases the session exactly once: by
/// [`close`](Self::close), or when the cache is dropped. A cache built with
/// [`shared`](Self::shared) leaves the session to whoever owns the store.
pub struct ObjectCache {
    store: Arc<dyn CacheStore>,
    observer: Arc<dyn CacheObserver>,
    owns_store: bool,
}

impl ObjectCache {
    /// Creates a cache that owns the given store, logging through `tracing`.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            observer: Arc::new(TracingObserver),
            owns_store: true,
        }
    }

    /// Creates a cache over a store owned elsewhere.
    ///
    /// Dropping or closing this cache leaves the store session open.
    #[must_use]
    pub fn shared(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            observer: Arc::new(TracingObserver),
            owns_store: false,
        }
    }

    /// Connects to Redis.
    pub async fn connect(config: &RedisConfig) -> CacheResult<Self> {
        let store = RedisCacheStore::connect(config).await?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Builds a cache from loaded settings.
    ///
    /// Connects when Redis is enabled and uses a disabled store otherwise.
    /// Metrics are published alongside logs when `telemetry.metrics` is set.
    pub async fn from_settings(settings: &CacheSettings) -> CacheResult<Self> {
        let store = if settings.redis.enabled {
            RedisCacheStore::connect(&settings.redis).await?
        } else {
            RedisCacheStore::disabled()
        };

        let cache = Self::new(Arc::new(store));
        if settings.telemetry.metrics {
            let observer = FanoutObserver::new()
                .with(Arc::new(TracingObserver))
                .with(Arc::new(MetricsObserver::registered()));
            Ok(cache.with_observer(Arc::new(observer)))
        } else {
            Ok(cache)
        }
    }

    /// Replaces the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Check if the underlying store has a usable session.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.store.is_enabled()
    }

    // ============ Set ============

    /// Stores `value` under `key`.
    ///
    /// With `ttl` the entry expires after it. Without, the entry persists and
    /// any expiry left by an earlier write is cleared.
    pub async fn try_set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> CacheResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let started = Instant::now();
        let result = self.write_value(key, value, ttl).await;
        self.observe(CacheOperation::Set, key, started, &result, |_| EventStatus::Stored);
        result
    }

    /// Stores `value` under `key`, returning `true` once the store acknowledged it.
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool
    where
        T: Serialize + Sync + ?Sized,
    {
        self.try_set(key, value, ttl).await.is_ok()
    }

    async fn write_value<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> CacheResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        validate_key(key)?;
        let ttl = ttl.map(validate_ttl).transpose()?;
        let payload = codec::encode(value)?;
        self.store.write(key, &payload, ttl).await
    }

    // ============ Get ============

    /// Reads the value under `key` as `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, key: &str) -> CacheOutcome<T> {
        let started = Instant::now();
        let result = self.read_value::<T>(key).await;
        self.observe(CacheOperation::Get, key, started, &result, |value| {
            if value.is_some() {
                EventStatus::Hit
            } else {
                EventStatus::Miss
            }
        });
        CacheOutcome::from(result)
    }

    /// Reads the value under `key`; `Ok(None)` means the key has no entry.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        self.fetch(key).await.into_result()
    }

    /// Reads the value under `key`, returning `None` when absent or on failure.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.fetch(key).await.into_option()
    }

    async fn read_value<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        validate_key(key)?;
        match self.store.read(key).await? {
            Some(payload) => codec::decode(&payload).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the cached value, or computes, caches and returns it.
    ///
    /// A failed read is treated like a miss. A failed write is reported to
    /// the observer but does not fail the call. Factory errors propagate.
    pub async fn get_or_insert_with<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        factory: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let CacheOutcome::Found(cached) = self.fetch::<T>(key).await {
            return Ok(cached);
        }

        let value = factory().await?;

        // Cache it (ignore errors as the value is still valid)
        let _ = self.try_set(key, &value, ttl).await;

        Ok(value)
    }

    // ============ Delete ============

    /// Removes `key`; `Ok(true)` iff an entry existed and was removed.
    pub async fn try_delete(&self, key: &str) -> CacheResult<bool> {
        let started = Instant::now();
        let result = match validate_key(key) {
            Ok(()) => self.store.remove(key).await,
            Err(err) => Err(err),
        };
        self.observe(CacheOperation::Delete, key, started, &result, applied);
        result
    }

    /// Removes `key`, returning `false` when it did not exist or on failure.
    pub async fn delete(&self, key: &str) -> bool {
        self.try_delete(key).await.unwrap_or(false)
    }

    // ============ Exists ============

    /// Checks whether `key` has an entry.
    pub async fn try_exists(&self, key: &str) -> CacheResult<bool> {
        let started = Instant::now();
        let result = match validate_key(key) {
            Ok(()) => self.store.contains(key).await,
            Err(err) => Err(err),
        };
        self.observe(CacheOperation::Exists, key, started, &result, applied);
        result
    }

    /// Checks whether `key` has an entry, returning `false` on failure.
    pub async fn exists(&self, key: &str) -> bool {
        self.try_exists(key).await.unwrap_or(false)
    }

    // ============ SetExpiry ============

    /// Sets or replaces the TTL of an existing entry without touching its
    /// payload. `Ok(false)` means the key does not exist.
    pub async fn try_set_expiry(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        let started = Instant::now();
        let result = match validate_key(key).and_then(|()| validate_ttl(ttl)) {
            Ok(ttl) => self.store.expire(key, ttl).await,
            Err(err) => Err(err),
        };
        self.observe(CacheOperation::SetExpiry, key, started, &result, applied);
        result
    }

    /// Sets or replaces the TTL of an existing entry, returning `false` when
    /// the key does not exist or on failure.
    pub async fn set_expiry(&self, key: &str, ttl: Duration) -> bool {
        self.try_set_expiry(key, ttl).await.unwrap_or(false)
    }

    /// Makes an existing entry expire at `at`, which must lie in the future.
    pub async fn try_set_expiry_at(&self, key: &str, at: DateTime<Utc>) -> CacheResult<bool> {
        let started = Instant::now();
        let result = match validate_key(key).and_then(|()| validate_deadline(at)) {
            Ok(()) => self.store.expire_at(key, at).await,
            Err(err) => Err(err),
        };
        self.observe(CacheOperation::SetExpiry, key, started, &result, applied);
        result
    }

    /// Makes an existing entry expire at `at`, returning `false` when the
    /// key does not exist or on failure.
    pub async fn set_expiry_at(&self, key: &str, at: DateTime<Utc>) -> bool {
        self.try_set_expiry_at(key, at).await.unwrap_or(false)
    }

    // ============ GetTimeToLive ============

    /// Reports the remaining lifetime of `key`.
    pub async fn try_time_to_live(&self, key: &str) -> CacheResult<KeyTtl> {
        let started = Instant::now();
        let result = match validate_key(key) {
            Ok(()) => self.store.ttl(key).await,
            Err(err) => Err(err),
        };
        self.observe(CacheOperation::TimeToLive, key, started, &result, |ttl| match ttl {
            KeyTtl::Missing => EventStatus::Miss,
            KeyTtl::Persistent | KeyTtl::Expiring(_) => EventStatus::Hit,
        });
        result
    }

    /// Remaining lifetime of `key`; `None` when the key has no expiry, does
    /// not exist, or the call failed.
    pub async fn time_to_live(&self, key: &str) -> Option<Duration> {
        self.try_time_to_live(key).await.ok().and_then(KeyTtl::remaining)
    }

    // ============ Lifecycle ============

    /// Releases the store session if this cache owns it.
    pub fn close(self) {
        debug!("Closing object cache");
        drop(self);
    }

    fn observe<T>(
        &self,
        operation: CacheOperation,
        key: &str,
        started: Instant,
        result: &CacheResult<T>,
        on_success: fn(&T) -> EventStatus<'static>,
    ) {
        let status = match result {
            Ok(value) => on_success(value),
            Err(err) => EventStatus::Failed(err),
        };
        self.observer.record(&CacheEvent {
            operation,
            key,
            elapsed: started.elapsed(),
            status,
        });
    }
}

impl Drop for ObjectCache {
    fn drop(&mut self) {
        if self.owns_store {
            self.store.close();
        }
    }
}

impl fmt::Debug for ObjectCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCache")
            .field("enabled", &self.store.is_enabled())
            .field("owns_store", &self.owns_store)
            .finish_non_exhaustive()
    }
}

fn applied(flag: &bool) -> EventStatus<'static> {
    EventStatus::Applied(*flag)
}

fn validate_key(key: &str) -> CacheResult<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

/// Zero TTLs are rejected rather than treated as immediate expiry.
fn validate_ttl(ttl: Duration) -> CacheResult<Duration> {
    if ttl.is_zero() {
        return Err(CacheError::InvalidTtl("TTL must be positive".to_string()));
    }
    Ok(ttl)
}

fn validate_deadline(at: DateTime<Utc>) -> CacheResult<()> {
    if at <= Utc::now() {
        return Err(CacheError::InvalidTtl(format!("expiry {} is not in the future", at)));
    }
    Ok(())
}
