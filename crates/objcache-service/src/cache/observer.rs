//! Injectable observability hook for cache operations.

use objcache_core::CacheError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Logical cache operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    Set,
    Get,
    Delete,
    Exists,
    SetExpiry,
    TimeToLive,
}

impl CacheOperation {
    /// Returns the operation name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Get => "get",
            Self::Delete => "delete",
            Self::Exists => "exists",
            Self::SetExpiry => "set_expiry",
            Self::TimeToLive => "time_to_live",
        }
    }
}

impl fmt::Display for CacheOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventStatus<'a> {
    /// A read found a value.
    Hit,
    /// A read found no entry.
    Miss,
    /// A write was acknowledged.
    Stored,
    /// A delete, exists or expiry command answered with this flag.
    Applied(bool),
    /// The operation failed with this cause.
    Failed(&'a CacheError),
}

impl EventStatus<'_> {
    /// Returns the status name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Stored => "stored",
            Self::Applied(true) => "applied",
            Self::Applied(false) => "not_applied",
            Self::Failed(_) => "failed",
        }
    }
}

/// One completed cache operation.
#[derive(Debug, Clone, Copy)]
pub struct CacheEvent<'a> {
    pub operation: CacheOperation,
    pub key: &'a str,
    pub elapsed: Duration,
    pub status: EventStatus<'a>,
}

/// Receives every completed cache operation, including failures that the
/// convenience accessors collapse into `false` or `None`.
pub trait CacheObserver: Send + Sync {
    /// Records one event. Must not block.
    fn record(&self, event: &CacheEvent<'_>);
}

/// Observer writing events to `tracing`.
///
/// Successes are logged at debug level, failures at warn level with the
/// error code and cause.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CacheObserver for TracingObserver {
    fn record(&self, event: &CacheEvent<'_>) {
        match event.status {
            EventStatus::Failed(err) => warn!(
                operation = %event.operation,
                key = event.key,
                elapsed_ms = elapsed_millis(event.elapsed),
                error_code = err.error_code(),
                error = %err,
                "Cache operation failed"
            ),
            status => debug!(
                operation = %event.operation,
                key = event.key,
                elapsed_ms = elapsed_millis(event.elapsed),
                status = status.as_str(),
                "Cache operation completed"
            ),
        }
    }
}

fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Observer forwarding each event to several observers.
#[derive(Clone, Default)]
pub struct FanoutObserver {
    observers: Vec<Arc<dyn CacheObserver>>,
}

impl FanoutObserver {
    /// Creates an empty fanout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer.
    #[must_use]
    pub fn with(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns true if no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl CacheObserver for FanoutObserver {
    fn record(&self, event: &CacheEvent<'_>) {
        for observer in &self.observers {
            observer.record(event);
        }
    }
}
