//! Integration tests for RedisCacheStore.
//!
//! These tests run against a real Redis server using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use chrono::Utc;
use common::{smartphone, Product, TestRedis};
use objcache_core::{CacheError, CacheOutcome};
use objcache_service::{build_cache_module, CacheStore, KeyTtl, ObjectCache, RedisCacheStore};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_set_get_delete() {
    let redis = TestRedis::new().await;
    let cache = redis.cache().await;
    let product = smartphone();

    assert!(cache.set("product:1", &product, Some(Duration::from_secs(300))).await);
    assert_eq!(cache.get::<Product>("product:1").await, Some(product));
    assert!(cache.exists("product:1").await);

    assert!(cache.delete("product:1").await);
    assert!(!cache.delete("product:1").await);
    assert!(cache.fetch::<Product>("product:1").await.is_absent());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ttl_expiry() {
    let redis = TestRedis::new().await;
    let cache = redis.cache().await;

    assert!(cache.set("session:1", &"token", Some(Duration::from_millis(100))).await);
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(!cache.exists("session:1").await);
    assert_eq!(cache.get::<String>("session:1").await, None);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_time_to_live_and_expiry() {
    let redis = TestRedis::new().await;
    let cache = redis.cache().await;

    assert_eq!(cache.try_time_to_live("missing").await, Ok(KeyTtl::Missing));

    cache.try_set("product:1", &smartphone(), None).await.unwrap();
    assert_eq!(cache.try_time_to_live("product:1").await, Ok(KeyTtl::Persistent));

    assert!(cache.set_expiry("product:1", Duration::from_secs(60)).await);
    let remaining = cache.time_to_live("product:1").await.unwrap();
    assert!(remaining > Duration::ZERO && remaining <= Duration::from_secs(60));

    let at = Utc::now() + chrono::Duration::seconds(120);
    assert!(cache.set_expiry_at("product:1", at).await);
    let remaining = cache.time_to_live("product:1").await.unwrap();
    assert!(remaining > Duration::from_secs(60));

    // Overwriting without a TTL clears the expiry.
    cache.try_set("product:1", &smartphone(), None).await.unwrap();
    assert_eq!(cache.time_to_live("product:1").await, None);

    assert!(!cache.set_expiry("missing", Duration::from_secs(60)).await);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_wrong_type_is_rejection() {
    let redis = TestRedis::new().await;
    let pool = deadpool_redis::Config::from_url(&redis.config().url)
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .unwrap();
    let mut conn = pool.get().await.unwrap();
    let _: i64 = redis::cmd("LPUSH")
        .arg("list:1")
        .arg("a")
        .query_async(&mut conn)
        .await
        .unwrap();

    let cache = redis.cache().await;
    assert!(matches!(
        cache.fetch::<Product>("list:1").await,
        CacheOutcome::Failed(CacheError::StoreRejection(_))
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_close_disables_store() {
    let redis = TestRedis::new().await;
    let store = Arc::new(RedisCacheStore::connect(redis.config()).await.unwrap());
    assert!(store.is_enabled());

    ObjectCache::new(store.clone()).close();

    assert!(!store.is_enabled());
    assert!(matches!(store.read("k").await, Err(CacheError::Connectivity(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_module_resolves_connected_store() {
    let redis = TestRedis::new().await;
    let module = build_cache_module(redis.config()).await.unwrap();
    let cache = ObjectCache::from_module(&module);

    assert!(cache.is_enabled());
    assert!(cache.set("product:1", &smartphone(), None).await);
    assert!(cache.exists("product:1").await);
}

#[tokio::test]
async fn test_unreachable_server_fails_to_connect() {
    let config = objcache_config::RedisConfig {
        connect_timeout_secs: 1,
        ..objcache_config::RedisConfig::from_url("redis://127.0.0.1:1")
    };

    let err = ObjectCache::connect(&config).await.unwrap_err();
    assert!(err.is_retriable());
}
