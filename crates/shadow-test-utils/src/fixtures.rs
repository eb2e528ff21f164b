//! Pre-validated identifiers for terse test setup.

use common::types::LocationId;

/// Build a validated `LocationId` from a literal label.
///
/// Panics on invalid labels, which fails the calling test.
#[must_use]
pub fn location(label: &str) -> LocationId {
    LocationId::parse(label).expect("test location label must be well-formed")
}
