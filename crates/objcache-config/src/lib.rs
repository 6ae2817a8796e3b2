//! # Objcache Config
//!
//! Settings for the object cache.
//! Supports layered configuration from files and environment variables,
//! with validation before anything connects to the store.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
