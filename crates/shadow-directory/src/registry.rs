//! Resource existence oracle consumed by the directory.
//!
//! RTC resources are created and destroyed exclusively by the external
//! session-management subsystem; the directory only asks whether a resource
//! currently exists. The oracle may live behind a network boundary, so
//! lookups can fail independently of the answer.

use crate::errors::RegistryError;
use async_trait::async_trait;
use common::types::RtcId;

/// Answers "does RTC resource X currently exist?".
///
/// Implemented by the resource-management subsystem (or a test mock).
/// `register` consults this before accepting a shadow, and the orphan sweep
/// uses it to detect shadows that outlived their resource.
#[async_trait]
pub trait ResourceRegistry: Send + Sync {
    /// Whether the resource currently exists.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the oracle could not be consulted at all;
    /// callers must treat that as "unknown", not as "absent".
    async fn exists(&self, rtc_id: RtcId) -> Result<bool, RegistryError>;
}
