//! # Objcache Service
//!
//! Typed object cache over Redis.
//! Values are stored as JSON under caller-chosen keys, with optional expiry,
//! and every operation reports its outcome instead of raising.

pub mod cache;
pub mod di;

pub use cache::*;
pub use di::*;
pub use objcache_core::{CacheError, CacheOutcome, CacheResult};
