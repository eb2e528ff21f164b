//! Shadow directory error types.
//!
//! Absence on lookup is not an error: `lookup` returns `Option`. The error
//! taxonomy covers only rejected mutations and oracle failures.

use common::types::{LocationId, RtcId, SessionId};
use thiserror::Error;

/// Errors returned by shadow directory mutations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The referenced RTC resource does not exist.
    ///
    /// Usually indicates a race with resource teardown. Callers may retry
    /// once after re-confirming resource existence; blind retries will keep
    /// failing.
    #[error("unknown RTC resource: {0}")]
    UnknownResource(RtcId),

    /// The requested (session, location) pairing already belongs to a
    /// different resource.
    ///
    /// Not retryable: the caller's assumption about session ownership is
    /// stale and must be resolved before re-registering.
    #[error("session {session_id} at {location_id} is already claimed by resource {held_by}")]
    Conflict {
        /// Session the caller tried to register.
        session_id: SessionId,
        /// Location the caller tried to register.
        location_id: LocationId,
        /// Resource that currently holds the pairing.
        held_by: RtcId,
    },

    /// The resource existence oracle failed to answer.
    ///
    /// Retryable: the directory state was not touched.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// The external resource registry could not be consulted.
#[derive(Debug, Error)]
#[error("resource registry unavailable: {0}")]
pub struct RegistryError(pub String);
