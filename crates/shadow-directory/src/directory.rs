//! Authoritative store of shadow records.
//!
//! The directory is the sole keeper of the RTC resource -> shadow mapping
//! and enforces its invariants:
//!
//! 1. At most one record per resource (registration replaces, never
//!    duplicates).
//! 2. The (rtc, session, location) triple is unique across the whole
//!    directory; collisions are rejected, never silently overwritten.
//! 3. A record always carries a session and a location, and its resource
//!    existed at registration time.
//! 4. No record outlives its resource (cascade release plus orphan sweep).
//!
//! # Concurrency
//!
//! All state lives behind one `tokio::sync::RwLock`. Registration performs
//! its global uniqueness check and mutation under a single write guard, so
//! no other register/release interleaves between check and apply. Reads
//! share the read guard and observe either the state before a mutation or
//! after it, never a partially applied one. Every critical section is a
//! bounded in-memory map operation; nothing blocks indefinitely.

use crate::errors::DirectoryError;
use crate::observability::metrics;
use crate::record::ShadowRecord;
use crate::registry::ResourceRegistry;
use common::types::{LocationId, RtcId, SessionId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Directory state: the primary map plus the derived uniqueness index over
/// the full triple. Both are maintained in the same critical section.
#[derive(Debug, Default)]
struct DirectoryState {
    /// Current shadow per resource. `rtc_id` is the sole uniqueness key.
    by_rtc: HashMap<RtcId, ShadowRecord>,
    /// Which resource holds each (session, location) pairing.
    by_pair: HashMap<(SessionId, LocationId), RtcId>,
}

/// Handle to the shadow directory.
///
/// Cheap to clone; all clones share the same underlying state. Mutations
/// verify resource existence against the [`ResourceRegistry`] oracle
/// provided at construction.
#[derive(Clone)]
pub struct ShadowDirectory {
    registry: Arc<dyn ResourceRegistry>,
    state: Arc<RwLock<DirectoryState>>,
}

impl ShadowDirectory {
    /// Create an empty directory backed by the given existence oracle.
    #[must_use]
    pub fn new(registry: Arc<dyn ResourceRegistry>) -> Self {
        Self {
            registry,
            state: Arc::new(RwLock::new(DirectoryState::default())),
        }
    }

    /// Insert or replace the shadow record for `rtc_id`.
    ///
    /// Re-registering the identical triple is idempotent and returns the
    /// existing record unchanged. A prior record for the same resource with
    /// a different session/location is atomically replaced once the
    /// conflict check passes; its (session, location) pairing becomes free
    /// in the same critical section.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::UnknownResource`] if the resource does not exist
    ///   (checked against the oracle; usually a race with teardown).
    /// - [`DirectoryError::Conflict`] if the (session, location) pairing is
    ///   already claimed by a different resource. The directory is left
    ///   untouched.
    /// - [`DirectoryError::Registry`] if the oracle could not be consulted.
    #[instrument(
        skip_all,
        fields(rtc_id = %rtc_id, session_id = %session_id, location_id = %location_id)
    )]
    pub async fn register(
        &self,
        rtc_id: RtcId,
        session_id: SessionId,
        location_id: LocationId,
    ) -> Result<ShadowRecord, DirectoryError> {
        let start = Instant::now();

        let exists = self.registry.exists(rtc_id).await.map_err(|e| {
            metrics::record_operation("register", "registry_error", start.elapsed());
            DirectoryError::from(e)
        })?;

        if !exists {
            metrics::record_operation("register", "unknown_resource", start.elapsed());
            return Err(DirectoryError::UnknownResource(rtc_id));
        }

        let mut state = self.state.write().await;

        if let Some(&held_by) = state.by_pair.get(&(session_id, location_id.clone())) {
            if held_by != rtc_id {
                metrics::record_operation("register", "conflict", start.elapsed());
                return Err(DirectoryError::Conflict {
                    session_id,
                    location_id,
                    held_by,
                });
            }

            // Identical triple already current: keep the original record.
            if let Some(existing) = state.by_rtc.get(&rtc_id) {
                if existing.matches(rtc_id, session_id, &location_id) {
                    debug!(
                        target: "shadow.directory",
                        rtc_id = %rtc_id,
                        "Shadow already current, no change"
                    );
                    metrics::record_operation("register", "success", start.elapsed());
                    return Ok(existing.clone());
                }
            }
        }

        let replaced = state.by_rtc.remove(&rtc_id);
        if let Some(prev) = &replaced {
            state.by_pair.remove(&(prev.session_id, prev.location_id.clone()));
        }

        let record = ShadowRecord::new(rtc_id, session_id, location_id.clone());
        state.by_pair.insert((session_id, location_id), rtc_id);
        state.by_rtc.insert(rtc_id, record.clone());
        metrics::set_shadow_count(state.by_rtc.len());
        drop(state);

        info!(
            target: "shadow.directory",
            rtc_id = %record.rtc_id,
            session_id = %record.session_id,
            location_id = %record.location_id,
            replaced = replaced.is_some(),
            "Shadow registered"
        );
        metrics::record_operation("register", "success", start.elapsed());

        Ok(record)
    }

    /// Current shadow for a resource, or `None`. Absence is a normal
    /// outcome, not an error.
    pub async fn lookup(&self, rtc_id: RtcId) -> Option<ShadowRecord> {
        let state = self.state.read().await;
        state.by_rtc.get(&rtc_id).cloned()
    }

    /// All shadows currently held at a location, as a point-in-time
    /// snapshot.
    ///
    /// The returned vector reflects directory state at call time; later
    /// mutations do not alter it, and it can be iterated any number of
    /// times. Used by failover/rebalancing logic to enumerate what a
    /// location holds.
    pub async fn lookup_by_location(&self, location_id: &LocationId) -> Vec<ShadowRecord> {
        let state = self.state.read().await;
        state
            .by_rtc
            .values()
            .filter(|record| record.location_id == *location_id)
            .cloned()
            .collect()
    }

    /// Remove the shadow record for `rtc_id` if present.
    ///
    /// Idempotent: releasing an absent record returns `None` and is not an
    /// error. Returns the removed record so callers (cascade, sweep) can
    /// log what was dropped.
    #[instrument(skip_all, fields(rtc_id = %rtc_id))]
    pub async fn release(&self, rtc_id: RtcId) -> Option<ShadowRecord> {
        let start = Instant::now();

        let mut state = self.state.write().await;
        let removed = state.by_rtc.remove(&rtc_id);

        if let Some(record) = &removed {
            state
                .by_pair
                .remove(&(record.session_id, record.location_id.clone()));
            metrics::set_shadow_count(state.by_rtc.len());
            drop(state);

            info!(
                target: "shadow.directory",
                rtc_id = %rtc_id,
                session_id = %record.session_id,
                location_id = %record.location_id,
                "Shadow released"
            );
            metrics::record_operation("release", "success", start.elapsed());
        } else {
            drop(state);
            debug!(
                target: "shadow.directory",
                rtc_id = %rtc_id,
                "Release of absent shadow, no-op"
            );
            metrics::record_operation("release", "noop", start.elapsed());
        }

        removed
    }

    /// Point-in-time snapshot of every record, used by the orphan sweep.
    pub async fn snapshot(&self) -> Vec<ShadowRecord> {
        let state = self.state.read().await;
        state.by_rtc.values().cloned().collect()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        let state = self.state.read().await;
        state.by_rtc.len()
    }

    /// Whether the directory holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
