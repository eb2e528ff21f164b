//! Cascade coordinator background task.
//!
//! Subscribes to resource deletion notifications from the session-management
//! subsystem and releases the deleted resource's shadow as part of the same
//! logical deletion. Release runs in the directory's write critical section,
//! so a lookup sees the shadow either present or absent, never a torn
//! intermediate state. Missed notifications (crash between deletion and
//! delivery) are healed by the orphan sweep.
//!
//! # Graceful Shutdown
//!
//! The task supports graceful shutdown via a cancellation token. When the
//! token is cancelled, the task finishes the event in flight and exits
//! cleanly. It also exits when the event channel closes.

use crate::directory::ShadowDirectory;
use crate::observability::metrics;
use common::types::RtcId;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Lifecycle notification from the resource-management subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceEvent {
    /// The RTC resource was destroyed; its shadow must not outlive it.
    Deleted {
        /// Resource that was destroyed.
        rtc_id: RtcId,
    },
}

/// Run the cascade coordinator loop.
///
/// Consumes [`ResourceEvent`]s and releases the corresponding shadow on
/// each deletion. Exits when the cancellation token is triggered or the
/// event channel closes.
///
/// # Arguments
///
/// * `directory` - Directory to release shadows from
/// * `events` - Deletion notifications from the resource-management subsystem
/// * `cancel_token` - Token for graceful shutdown
#[instrument(skip_all, name = "shadow.task.cascade")]
pub async fn start_cascade_coordinator(
    directory: ShadowDirectory,
    mut events: mpsc::Receiver<ResourceEvent>,
    cancel_token: CancellationToken,
) {
    info!(
        target: "shadow.cascade",
        "Starting cascade coordinator task"
    );

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(ResourceEvent::Deleted { rtc_id }) => {
                        handle_deletion(&directory, rtc_id).await;
                    }
                    None => {
                        info!(
                            target: "shadow.cascade",
                            "Resource event channel closed, exiting"
                        );
                        break;
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "shadow.cascade",
                    "Cascade coordinator received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(
        target: "shadow.cascade",
        "Cascade coordinator task stopped"
    );
}

/// Release the shadow of a deleted resource.
async fn handle_deletion(directory: &ShadowDirectory, rtc_id: RtcId) {
    match directory.release(rtc_id).await {
        Some(record) => {
            metrics::record_cascade_release();
            info!(
                target: "shadow.cascade",
                rtc_id = %rtc_id,
                session_id = %record.session_id,
                location_id = %record.location_id,
                "Cascade released shadow of deleted resource"
            );
        }
        None => {
            debug!(
                target: "shadow.cascade",
                rtc_id = %rtc_id,
                "Deleted resource had no shadow"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::errors::RegistryError;
    use crate::registry::ResourceRegistry;
    use async_trait::async_trait;
    use common::types::{LocationId, SessionId};
    use std::sync::Arc;
    use std::time::Duration;

    struct AlwaysExists;

    #[async_trait]
    impl ResourceRegistry for AlwaysExists {
        async fn exists(&self, _rtc_id: RtcId) -> Result<bool, RegistryError> {
            Ok(true)
        }
    }

    fn location(label: &str) -> LocationId {
        LocationId::parse(label).unwrap()
    }

    #[tokio::test]
    async fn test_cascade_releases_deleted_resource() {
        let directory = ShadowDirectory::new(Arc::new(AlwaysExists));
        let rtc = RtcId::new();
        let unaffected = RtcId::new();

        directory
            .register(rtc, SessionId(100), location("mc-a"))
            .await
            .unwrap();
        directory
            .register(unaffected, SessionId(200), location("mc-b"))
            .await
            .unwrap();

        let (tx, rx) = mpsc::channel(8);
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(start_cascade_coordinator(
            directory.clone(),
            rx,
            cancel_token.clone(),
        ));

        tx.send(ResourceEvent::Deleted { rtc_id: rtc }).await.unwrap();

        // The shadow disappears within bounded time.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while directory.lookup(rtc).await.is_some() {
            assert!(
                tokio::time::Instant::now() < deadline,
                "Shadow should be released after resource deletion"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // Other records are untouched.
        assert!(directory.lookup(unaffected).await.is_some());

        cancel_token.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("Cascade coordinator should stop after cancellation")
            .expect("Task should not panic");
    }

    #[tokio::test]
    async fn test_cascade_deletion_without_shadow_is_noop() {
        let directory = ShadowDirectory::new(Arc::new(AlwaysExists));
        let (tx, rx) = mpsc::channel(8);
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(start_cascade_coordinator(
            directory.clone(),
            rx,
            cancel_token.clone(),
        ));

        tx.send(ResourceEvent::Deleted { rtc_id: RtcId::new() })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(directory.is_empty().await);

        cancel_token.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    }

    #[tokio::test]
    async fn test_cascade_exits_when_channel_closes() {
        let directory = ShadowDirectory::new(Arc::new(AlwaysExists));
        let (tx, rx) = mpsc::channel::<ResourceEvent>(8);
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(start_cascade_coordinator(
            directory,
            rx,
            cancel_token,
        ));

        drop(tx);

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(
            result.is_ok(),
            "Cascade coordinator should exit when the event channel closes"
        );
    }
}
