//! JSON boundary between typed values and stored text.

use objcache_core::CacheResult;
use serde::{de::DeserializeOwned, Serialize};

/// Encodes a value as JSON text.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> CacheResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes JSON text into `T`.
pub fn decode<T: DeserializeOwned>(payload: &str) -> CacheResult<T> {
    Ok(serde_json::from_str(payload)?)
}
