//! Identity types for RTC resources, sessions, and locations.
//!
//! These are opaque newtypes: the directory never interprets their contents
//! beyond equality and hashing. `LocationId` is the only one with a
//! well-formedness rule, enforced at construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an RTC resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RtcId(pub Uuid);

impl RtcId {
    /// Create a new random RTC resource ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RtcId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RtcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Numbered instance of a resource's active communication state.
///
/// Session identifiers are assigned by the session-management subsystem as
/// signed 64-bit integers; every `i64` is a well-formed session ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub i64);

impl From<i64> for SessionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier for a cluster node/service instance capable of holding a
/// session shadow.
///
/// Location IDs are agent labels (e.g. `"mc-east-1.signaling"`). They must
/// be non-empty and free of whitespace and control characters; `parse`
/// enforces this so that holding a `LocationId` is proof of
/// well-formedness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationId(String);

impl LocationId {
    /// Parse and validate a location identifier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocationId` if the input is empty or contains
    /// whitespace or control characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidLocationId> {
        let value = value.into();

        if value.is_empty() {
            return Err(InvalidLocationId::Empty);
        }

        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidLocationId::IllegalCharacter);
        }

        Ok(Self(value))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for LocationId {
    type Error = InvalidLocationId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<LocationId> for String {
    fn from(value: LocationId) -> Self {
        value.0
    }
}

/// A location identifier failed well-formedness validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidLocationId {
    /// The identifier was empty.
    #[error("location ID must not be empty")]
    Empty,

    /// The identifier contained whitespace or control characters.
    #[error("location ID must not contain whitespace or control characters")]
    IllegalCharacter,
}
