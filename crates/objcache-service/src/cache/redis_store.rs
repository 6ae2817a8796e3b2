//! Redis-based store client.

use super::{CacheStore, KeyTtl};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{Pool, Runtime};
use objcache_config::RedisConfig;
use objcache_core::{CacheError, CacheResult};
use redis::{ErrorKind, RedisError};
use shaku::Component;
use std::time::Duration;
use tracing::{debug, info};

/// Redis-based store client.
///
/// Every operation checks a connection out of the pool and issues a single
/// command, so concurrent callers share the pool without extra locking.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    /// Redis connection pool.
    pool: Option<Pool>,
}

impl RedisCacheStore {
    /// Connects to Redis and verifies the server answers `PING`.
    pub async fn connect(config: &RedisConfig) -> CacheResult<Self> {
        info!("Creating Redis connection pool for object cache...");

        let timeout = config.connect_timeout();
        let pool = deadpool_redis::Config::from_url(&config.url)
            .builder()
            .map_err(|e| CacheError::Configuration(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .build()
            .map_err(|e| CacheError::Configuration(format!("Failed to create pool: {}", e)))?;

        let store = Self::from_pool(pool);
        store.ping().await?;

        info!(pool_size = config.pool_size, "Redis connection pool created successfully");
        Ok(store)
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn from_pool(pool: Pool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a store without a session (for when Redis is disabled).
    ///
    /// Every operation fails with a connectivity error.
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Converts the store into Shaku component parameters.
    #[must_use]
    pub fn into_parameters(self) -> RedisCacheStoreParameters {
        RedisCacheStoreParameters { pool: self.pool }
    }

    /// Round-trips a `PING` to the server.
    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| classify_redis_error(e, "Failed to ping Redis"))?;
        Ok(())
    }

    /// Get a connection from the pool.
    async fn conn(&self) -> CacheResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                CacheError::Connectivity(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(CacheError::connectivity("Cache is disabled")),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn write(&self, key: &str, payload: &str, ttl: Option<Duration>) -> CacheResult<()> {
        let mut conn = self.conn().await?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(payload);
        if let Some(ttl) = ttl {
            cmd.arg("PX").arg(ttl_millis(ttl));
        }

        let _: () = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| classify_redis_error(e, &format!("Failed to set key '{}'", key)))?;

        debug!("Cached key '{}' with TTL {:?}", key, ttl);
        Ok(())
    }

    async fn read(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| classify_redis_error(e, &format!("Failed to get key '{}'", key)))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn remove(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.conn().await?;
        let deleted: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| classify_redis_error(e, &format!("Failed to delete key '{}'", key)))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn contains(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.conn().await?;
        let found: i64 = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| classify_redis_error(e, &format!("Failed to check key '{}'", key)))?;

        Ok(found > 0)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        let mut conn = self.conn().await?;
        let applied: i64 = redis::cmd("PEXPIRE")
            .arg(key)
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| classify_redis_error(e, &format!("Failed to expire key '{}'", key)))?;

        debug!("Set TTL {:?} on key '{}': {}", ttl, key, applied > 0);
        Ok(applied > 0)
    }

    async fn expire_at(&self, key: &str, at: DateTime<Utc>) -> CacheResult<bool> {
        let mut conn = self.conn().await?;
        let applied: i64 = redis::cmd("PEXPIREAT")
            .arg(key)
            .arg(at.timestamp_millis())
            .query_async(&mut conn)
            .await
            .map_err(|e| classify_redis_error(e, &format!("Failed to expire key '{}'", key)))?;

        debug!("Set expiry {} on key '{}': {}", at, key, applied > 0);
        Ok(applied > 0)
    }

    async fn ttl(&self, key: &str) -> CacheResult<KeyTtl> {
        let mut conn = self.conn().await?;
        let reply: i64 = redis::cmd("PTTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| classify_redis_error(e, &format!("Failed to read TTL of key '{}'", key)))?;

        Ok(ttl_from_reply(reply))
    }

    fn close(&self) {
        if let Some(pool) = &self.pool {
            if !pool.is_closed() {
                pool.close();
                info!("Redis connection pool closed");
            }
        }
    }

    fn is_enabled(&self) -> bool {
        self.pool.as_ref().is_some_and(|pool| !pool.is_closed())
    }
}

/// Converts a TTL to whole milliseconds, rounding sub-millisecond values up.
fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis().max(1)).unwrap_or(i64::MAX)
}

/// Interprets a `PTTL` reply: `-2` for a missing key, `-1` for no expiry.
///
/// A key with no whole millisecond left is expiring right now and is
/// reported as missing.
fn ttl_from_reply(reply: i64) -> KeyTtl {
    match reply {
        -1 => KeyTtl::Persistent,
        ms if ms > 0 => KeyTtl::Expiring(Duration::from_millis(ms.unsigned_abs())),
        _ => KeyTtl::Missing,
    }
}

/// Sorts a Redis error into the cache error taxonomy.
fn classify_redis_error(err: RedisError, context: &str) -> CacheError {
    let message = format!("{}: {}", context, err);

    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
        || err.kind() == ErrorKind::AuthenticationFailed
    {
        CacheError::Connectivity(message)
    } else if err.kind() == ErrorKind::TypeError {
        CacheError::Serialization(message)
    } else {
        CacheError::StoreRejection(message)
    }
}
