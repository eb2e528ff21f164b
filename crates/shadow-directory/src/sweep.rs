//! Orphan reconciliation sweep background task.
//!
//! Safety net behind the cascade coordinator: if a deletion notification is
//! lost (crash between resource deletion and shadow release), the shadow
//! would outlive its resource. The sweep periodically re-checks every
//! record against the resource existence oracle and purges shadows whose
//! resource no longer exists. Discrepancies are reported as observability
//! events, not fatal errors.
//!
//! # Graceful Shutdown
//!
//! The task supports graceful shutdown via a cancellation token. When the
//! token is cancelled, the task completes its current iteration and exits
//! cleanly.

use crate::directory::ShadowDirectory;
use crate::observability::metrics;
use crate::registry::ResourceRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Default sweep interval in seconds.
const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Configuration for the orphan sweep task.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Sweep interval in seconds.
    pub check_interval_seconds: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            check_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
        }
    }
}

impl SweepConfig {
    /// Create config from environment variables.
    ///
    /// Environment variables:
    /// - `SHADOW_SWEEP_INTERVAL_SECONDS` - Sweep interval (default: 60)
    #[must_use]
    pub fn from_env() -> Self {
        let check_interval_seconds = std::env::var("SHADOW_SWEEP_INTERVAL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECONDS);

        Self {
            check_interval_seconds,
        }
    }
}

/// Start the orphan sweep background task.
///
/// Runs in a loop, purging orphaned shadows at the configured interval.
/// Exits gracefully when the cancellation token is triggered.
///
/// # Arguments
///
/// * `directory` - Directory to reconcile
/// * `registry` - Resource existence oracle
/// * `config` - Sweep configuration
/// * `cancel_token` - Token for graceful shutdown
#[instrument(skip_all, name = "shadow.task.sweep")]
pub async fn start_orphan_sweep(
    directory: ShadowDirectory,
    registry: Arc<dyn ResourceRegistry>,
    config: SweepConfig,
    cancel_token: CancellationToken,
) {
    info!(
        target: "shadow.sweep",
        check_interval_seconds = config.check_interval_seconds,
        "Starting orphan sweep task"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.check_interval_seconds));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                run_sweep(&directory, registry.as_ref()).await;
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "shadow.sweep",
                    "Orphan sweep task received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(
        target: "shadow.sweep",
        "Orphan sweep task stopped"
    );
}

/// Run a single sweep iteration.
///
/// Snapshots the directory, checks each record's resource against the
/// oracle, and releases records whose resource is gone. Oracle failures
/// skip the record until the next pass. Returns the number of purged
/// orphans. Separated from the main loop to allow direct testing.
pub(crate) async fn run_sweep(
    directory: &ShadowDirectory,
    registry: &dyn ResourceRegistry,
) -> u64 {
    let mut purged: u64 = 0;

    for record in directory.snapshot().await {
        match registry.exists(record.rtc_id).await {
            Ok(true) => {}
            Ok(false) => {
                if directory.release(record.rtc_id).await.is_some() {
                    purged += 1;
                    warn!(
                        target: "shadow.sweep",
                        rtc_id = %record.rtc_id,
                        session_id = %record.session_id,
                        location_id = %record.location_id,
                        "Purged orphaned shadow, resource no longer exists"
                    );
                }
            }
            Err(e) => {
                warn!(
                    target: "shadow.sweep",
                    rtc_id = %record.rtc_id,
                    error = %e,
                    "Skipping record, resource registry unavailable"
                );
            }
        }
    }

    if purged > 0 {
        metrics::record_orphans_purged(purged);
        warn!(
            target: "shadow.sweep",
            purged_count = purged,
            "Orphan sweep purged shadows without a live resource"
        );
    }

    purged
}
