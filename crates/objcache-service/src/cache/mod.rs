//! Object caching over a remote key-value store.
//!
//! [`ObjectCache`] stores serializable values as JSON text through a
//! [`CacheStore`], with [`RedisCacheStore`] as the Redis implementation.
//! Outcomes of every operation are reported to a [`CacheObserver`].

pub mod codec;
pub mod keys;
pub mod metrics;
mod object_cache;
pub mod observer;
mod redis_store;
mod store;

pub use keys::KeyBuilder;
pub use metrics::MetricsObserver;
pub use object_cache::ObjectCache;
pub use observer::{CacheEvent, CacheObserver, CacheOperation, EventStatus, FanoutObserver, TracingObserver};
pub use redis_store::{RedisCacheStore, RedisCacheStoreParameters};
pub use store::{CacheStore, KeyTtl};
