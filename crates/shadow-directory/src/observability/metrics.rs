//! Metrics definitions for the shadow directory.
//!
//! All metrics follow Prometheus naming conventions:
//! - `sd_` prefix for the shadow directory
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `operation`: 2 values (register, release)
//! - `status`: bounded by code (success, noop, conflict, unknown_resource,
//!   registry_error)
//!
//! Resource, session, and location identifiers are never used as labels.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Record a directory operation outcome.
///
/// Metrics: `sd_directory_operations_total`,
/// `sd_directory_operation_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_operation(operation: &'static str, status: &'static str, duration: Duration) {
    counter!("sd_directory_operations_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);

    histogram!("sd_directory_operation_duration_seconds",
        "operation" => operation,
        "status" => status
    )
    .record(duration.as_secs_f64());
}

/// Update the current number of shadow records.
///
/// Metric: `sd_shadow_records`
#[allow(clippy::cast_precision_loss)] // Record counts are far below 2^52
pub fn set_shadow_count(count: usize) {
    gauge!("sd_shadow_records").set(count as f64);
}

/// Record a shadow released by the cascade coordinator.
///
/// Metric: `sd_cascade_releases_total`
pub fn record_cascade_release() {
    counter!("sd_cascade_releases_total").increment(1);
}

/// Record orphaned shadows purged by a sweep iteration.
///
/// Metric: `sd_orphans_purged_total`
pub fn record_orphans_purged(count: u64) {
    counter!("sd_orphans_purged_total").increment(count);
}
