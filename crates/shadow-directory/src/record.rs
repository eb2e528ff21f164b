//! Shadow record value type.

use chrono::{DateTime, Utc};
use common::types::{LocationId, RtcId, SessionId};
use serde::{Deserialize, Serialize};

/// The current shadow of one RTC resource: which session instance is live
/// and which location holds it.
///
/// Immutable once constructed. A change of session or location is a new
/// registration that replaces the whole record; there are no partial
/// updates. Well-formedness of the identifiers is carried by the types
/// themselves; cross-record uniqueness is the directory's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowRecord {
    /// Owning RTC resource.
    pub rtc_id: RtcId,
    /// Live session instance.
    pub session_id: SessionId,
    /// Location (agent) holding the shadow.
    pub location_id: LocationId,
    /// When this registration was accepted.
    pub registered_at: DateTime<Utc>,
}

impl ShadowRecord {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(rtc_id: RtcId, session_id: SessionId, location_id: LocationId) -> Self {
        Self {
            rtc_id,
            session_id,
            location_id,
            registered_at: Utc::now(),
        }
    }

    /// Whether this record represents the same claim as the given triple.
    ///
    /// Timestamp is intentionally excluded: two registrations of the same
    /// triple are the same logical claim.
    #[must_use]
    pub fn matches(&self, rtc_id: RtcId, session_id: SessionId, location_id: &LocationId) -> bool {
        self.rtc_id == rtc_id && self.session_id == session_id && self.location_id == *location_id
    }
}
