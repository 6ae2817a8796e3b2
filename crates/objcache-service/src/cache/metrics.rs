//! Metrics for cache operations.
//!
//! Events are published through the `metrics` facade; without an installed
//! recorder they are discarded.

use super::observer::{CacheEvent, CacheObserver, EventStatus};
use metrics::{counter, describe_counter, describe_histogram, histogram};

/// Metric names for the object cache.
pub mod names {
    /// Total operations, labelled by operation and status.
    pub const OPERATIONS_TOTAL: &str = "objcache_operations_total";
    /// Total failed operations, labelled by operation and error code.
    pub const FAILURES_TOTAL: &str = "objcache_failures_total";
    /// Operation duration in seconds, labelled by operation.
    pub const OPERATION_DURATION_SECONDS: &str = "objcache_operation_duration_seconds";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::OPERATIONS_TOTAL,
        "Total number of cache operations by outcome"
    );
    describe_counter!(
        names::FAILURES_TOTAL,
        "Total number of failed cache operations by error code"
    );
    describe_histogram!(
        names::OPERATION_DURATION_SECONDS,
        "Cache operation duration in seconds"
    );
}

/// Observer publishing counters and latency histograms.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver;

impl MetricsObserver {
    /// Registers metric descriptions and returns the observer.
    #[must_use]
    pub fn registered() -> Self {
        register_metrics();
        Self
    }
}

impl CacheObserver for MetricsObserver {
    fn record(&self, event: &CacheEvent<'_>) {
        let operation = event.operation.as_str();

        counter!(
            names::OPERATIONS_TOTAL,
            "operation" => operation,
            "status" => event.status.as_str()
        )
        .increment(1);

        if let EventStatus::Failed(err) = event.status {
            counter!(
                names::FAILURES_TOTAL,
                "operation" => operation,
                "error_code" => err.error_code()
            )
            .increment(1);
        }

        histogram!(names::OPERATION_DURATION_SECONDS, "operation" => operation)
            .record(event.elapsed.as_secs_f64());
    }
}
