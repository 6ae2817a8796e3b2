//! Dependency injection module using Shaku.

use crate::cache::{CacheStore, ObjectCache, RedisCacheStore};
use objcache_config::RedisConfig;
use objcache_core::{module, CacheResult, HasComponent};
use std::sync::Arc;

// Cache module providing the Redis store client.
module! {
    pub CacheModule {
        components = [
            RedisCacheStore,
        ],
        providers = [],
    }
}

/// Builds the cache module.
///
/// Connects to Redis when enabled; otherwise the module holds a disabled
/// store whose operations all fail with a connectivity error.
pub async fn build_cache_module(redis_config: &RedisConfig) -> CacheResult<Arc<CacheModule>> {
    let store = if redis_config.enabled {
        RedisCacheStore::connect(redis_config).await?
    } else {
        RedisCacheStore::disabled()
    };

    let module = CacheModule::builder()
        .with_component_parameters::<RedisCacheStore>(store.into_parameters())
        .build();

    Ok(Arc::new(module))
}

/// Trait for resolving cache components.
pub trait CacheResolver {
    /// Resolves the store client from the module.
    fn cache_store(&self) -> Arc<dyn CacheStore>;
}

impl CacheResolver for CacheModule {
    fn cache_store(&self) -> Arc<dyn CacheStore> {
        self.resolve()
    }
}

impl ObjectCache {
    /// Creates a cache over the store held by the module.
    ///
    /// The module owns the session; it is released when the module is
    /// dropped, so any number of caches may be built from one module.
    #[must_use]
    pub fn from_module(module: &CacheModule) -> Self {
        Self::shared(module.cache_store())
    }
}
