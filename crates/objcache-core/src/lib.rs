//! # Objcache Core
//!
//! Core types shared by every objcache crate: the cache error taxonomy,
//! result aliases, the tri-state read outcome and tracing initialisation.

pub mod error;
pub mod outcome;
pub mod result;
pub mod telemetry;

pub use error::*;
pub use outcome::*;
pub use result::*;
pub use telemetry::TelemetryConfig;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
