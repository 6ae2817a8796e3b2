//! Shared test doubles for object cache tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use objcache_config::RedisConfig;
use objcache_core::{CacheError, CacheResult};
use objcache_service::{CacheEvent, CacheObserver, CacheStore, KeyTtl, ObjectCache};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::Redis;

/// Catalogue product used as the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

/// Creates the sample smartphone product.
pub fn smartphone() -> Product {
    Product {
        id: 1,
        name: "Smartphone X".to_string(),
        price: 999.99,
        category: "Electronics".to_string(),
        description: "Latest model with advanced features.".to_string(),
        in_stock: true,
        created_at: Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap(),
    }
}

struct Entry {
    payload: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// In-memory store with expiry and fault injection.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    failure: Mutex<Option<CacheError>>,
    calls: AtomicUsize,
    closes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with `err` until [`heal`](Self::heal).
    pub fn fail_with(&self, err: CacheError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn heal(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Stores a raw payload, bypassing the codec.
    pub fn insert_raw(&self, key: &str, payload: &str) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                payload: payload.to_string(),
                expires_at: None,
            },
        );
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.payload.clone())
    }

    /// Number of store calls, excluding `close` and `is_enabled`.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn begin(&self) -> CacheResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.closes() > 0 {
            return Err(CacheError::connectivity("session closed"));
        }
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Runs `f` on the live entry for `key`, dropping it first if expired.
    fn with_live<R>(&self, key: &str, f: impl FnOnce(Option<&mut Entry>) -> R) -> R {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        f(entries.get_mut(key))
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn write(&self, key: &str, payload: &str, ttl: Option<Duration>) -> CacheResult<()> {
        self.begin()?;
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                payload: payload.to_string(),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn read(&self, key: &str) -> CacheResult<Option<String>> {
        self.begin()?;
        Ok(self.with_live(key, |entry| entry.map(|entry| entry.payload.clone())))
    }

    async fn remove(&self, key: &str) -> CacheResult<bool> {
        self.begin()?;
        let existed = self.with_live(key, |entry| entry.is_some());
        if existed {
            self.entries.lock().unwrap().remove(key);
        }
        Ok(existed)
    }

    async fn contains(&self, key: &str) -> CacheResult<bool> {
        self.begin()?;
        Ok(self.with_live(key, |entry| entry.is_some()))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        self.begin()?;
        Ok(self.with_live(key, |entry| match entry {
            Some(entry) => {
                entry.expires_at = Some(Instant::now() + ttl);
                true
            }
            None => false,
        }))
    }

    async fn expire_at(&self, key: &str, at: DateTime<Utc>) -> CacheResult<bool> {
        let ttl = (at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        self.expire(key, ttl).await
    }

    async fn ttl(&self, key: &str) -> CacheResult<KeyTtl> {
        self.begin()?;
        let now = Instant::now();
        Ok(self.with_live(key, |entry| match entry {
            None => KeyTtl::Missing,
            Some(Entry { expires_at: None, .. }) => KeyTtl::Persistent,
            Some(Entry { expires_at: Some(at), .. }) => KeyTtl::Expiring(at.saturating_duration_since(now)),
        }))
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.closes() == 0
    }
}

/// Observer keeping `(operation, key, status)` for every event.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(String, String, String)>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<(String, String, String)> {
        self.events.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events().into_iter().map(|(_, _, status)| status).collect()
    }
}

impl CacheObserver for RecordingObserver {
    fn record(&self, event: &CacheEvent<'_>) {
        self.events.lock().unwrap().push((
            event.operation.as_str().to_string(),
            event.key.to_string(),
            event.status.as_str().to_string(),
        ));
    }
}

/// Test Redis container wrapper.
///
/// Keeps the container alive for as long as the wrapper lives.
pub struct TestRedis {
    _container: ContainerAsync<Redis>,
    config: RedisConfig,
}

impl TestRedis {
    /// Starts a fresh Redis container.
    pub async fn new() -> Self {
        let container = Redis::default()
            .start()
            .await
            .expect("Failed to start Redis container");

        let port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");

        let config = RedisConfig {
            pool_size: 4,
            ..RedisConfig::from_url(format!("redis://127.0.0.1:{}", port))
        };

        Self {
            _container: container,
            config,
        }
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    /// Connects a cache, retrying while the server starts accepting clients.
    pub async fn cache(&self) -> ObjectCache {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match ObjectCache::connect(&self.config).await {
                Ok(cache) => return cache,
                Err(e) => {
                    if attempts >= 30 {
                        panic!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    }
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
            }
        }
    }
}
