//! In-memory mock of the resource-management subsystem.
//!
//! Plays both external roles the directory consumes: the resource
//! existence oracle and the deletion notification feed. Tests drive
//! resource lifecycle through `create_resource`/`delete_resource` and the
//! mock keeps the oracle answers and the event channel consistent.
//!
//! # Example
//!
//! ```rust,ignore
//! let (registry, events) = MockResourceRegistry::with_event_channel(8);
//! let rtc = registry.create_resource();
//! assert!(registry.exists(rtc).await.unwrap());
//!
//! registry.delete_resource(rtc).await;
//! assert_eq!(events.recv().await, Some(ResourceEvent::Deleted { rtc_id: rtc }));
//! ```

use async_trait::async_trait;
use common::types::RtcId;
use shadow_directory::cascade::ResourceEvent;
use shadow_directory::errors::RegistryError;
use shadow_directory::registry::ResourceRegistry;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Mock resource-management subsystem for directory testing.
#[derive(Clone)]
pub struct MockResourceRegistry {
    inner: Arc<Mutex<MockRegistryInner>>,
}

struct MockRegistryInner {
    /// Currently existing resources.
    live: HashSet<RtcId>,
    /// Deletion notification sink, if wired.
    events: Option<mpsc::Sender<ResourceEvent>>,
    /// When true, `exists` fails to simulate an unreachable oracle.
    fail_lookups: bool,
}

impl MockResourceRegistry {
    /// Create a mock with no deletion event channel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockRegistryInner {
                live: HashSet::new(),
                events: None,
                fail_lookups: false,
            })),
        }
    }

    /// Create a mock wired to a deletion event channel.
    ///
    /// The receiver is what a cascade coordinator would consume.
    #[must_use]
    pub fn with_event_channel(buffer: usize) -> (Self, mpsc::Receiver<ResourceEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        let registry = Self::new();
        registry.inner.lock().unwrap().events = Some(tx);
        (registry, rx)
    }

    /// Create a new resource and return its ID.
    #[must_use]
    pub fn create_resource(&self) -> RtcId {
        let rtc_id = RtcId::new();
        self.inner.lock().unwrap().live.insert(rtc_id);
        rtc_id
    }

    /// Register an externally chosen resource ID as existing.
    pub fn insert_resource(&self, rtc_id: RtcId) {
        self.inner.lock().unwrap().live.insert(rtc_id);
    }

    /// Destroy a resource and emit a deletion event if a channel is wired.
    pub async fn delete_resource(&self, rtc_id: RtcId) {
        let events = {
            let mut inner = self.inner.lock().unwrap();
            inner.live.remove(&rtc_id);
            inner.events.clone()
        };

        if let Some(tx) = events {
            tx.send(ResourceEvent::Deleted { rtc_id })
                .await
                .expect("deletion event receiver dropped");
        }
    }

    /// Destroy a resource WITHOUT emitting a deletion event.
    ///
    /// Simulates a lost notification (crash between resource deletion and
    /// shadow release) so tests can exercise the orphan sweep.
    pub fn delete_resource_silently(&self, rtc_id: RtcId) {
        self.inner.lock().unwrap().live.remove(&rtc_id);
    }

    /// Whether the mock currently considers the resource live.
    #[must_use]
    pub fn contains(&self, rtc_id: RtcId) -> bool {
        self.inner.lock().unwrap().live.contains(&rtc_id)
    }

    /// Toggle oracle failure for `exists` calls.
    pub fn set_fail_lookups(&self, fail: bool) {
        self.inner.lock().unwrap().fail_lookups = fail;
    }
}

impl Default for MockResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceRegistry for MockResourceRegistry {
    async fn exists(&self, rtc_id: RtcId) -> Result<bool, RegistryError> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_lookups {
            return Err(RegistryError("mock registry unavailable".to_string()));
        }
        Ok(inner.live.contains(&rtc_id))
    }
}
