//! Integration tests for cascade release and orphan reconciliation:
//! resource deletion and shadow release must never diverge.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use common::types::{RtcId, SessionId};
use shadow_directory::{
    start_cascade_coordinator, start_orphan_sweep, ShadowDirectory, SweepConfig,
};
use shadow_test_utils::{location, MockResourceRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Poll until the condition holds or the deadline passes.
async fn wait_until<F, Fut>(deadline: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let end = tokio::time::Instant::now() + deadline;
    while tokio::time::Instant::now() < end {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test]
async fn test_resource_deletion_cascades_into_release() {
    let (registry, events) = MockResourceRegistry::with_event_channel(8);
    let directory = ShadowDirectory::new(Arc::new(registry.clone()));

    let doomed = registry.create_resource();
    let survivor = registry.create_resource();
    directory
        .register(doomed, SessionId(100), location("mc-a"))
        .await
        .unwrap();
    directory
        .register(survivor, SessionId(200), location("mc-b"))
        .await
        .unwrap();

    let cancel_token = CancellationToken::new();
    let coordinator = tokio::spawn(start_cascade_coordinator(
        directory.clone(),
        events,
        cancel_token.clone(),
    ));

    registry.delete_resource(doomed).await;

    let released = {
        let directory = directory.clone();
        wait_until(Duration::from_secs(2), move || {
            let directory = directory.clone();
            async move { directory.lookup(doomed).await.is_none() }
        })
        .await
    };
    assert!(released, "shadow must not outlive its resource");

    // Resource and shadow agree for the survivor too: both still present.
    assert!(registry.contains(survivor));
    assert!(directory.lookup(survivor).await.is_some());

    cancel_token.cancel();
    tokio::time::timeout(Duration::from_secs(2), coordinator)
        .await
        .expect("coordinator should stop after cancellation")
        .expect("coordinator should not panic");
}

#[tokio::test]
async fn test_sweep_heals_missed_deletion_event() {
    let registry = MockResourceRegistry::new();
    let directory = ShadowDirectory::new(Arc::new(registry.clone()));

    let lost = registry.create_resource();
    let live = registry.create_resource();
    directory
        .register(lost, SessionId(1), location("mc-a"))
        .await
        .unwrap();
    directory
        .register(live, SessionId(2), location("mc-b"))
        .await
        .unwrap();

    // Deletion notification never arrives.
    registry.delete_resource_silently(lost);

    let cancel_token = CancellationToken::new();
    let sweep = tokio::spawn(start_orphan_sweep(
        directory.clone(),
        Arc::new(registry.clone()),
        SweepConfig {
            check_interval_seconds: 1,
        },
        cancel_token.clone(),
    ));

    let purged = {
        let directory = directory.clone();
        wait_until(Duration::from_secs(5), move || {
            let directory = directory.clone();
            async move { directory.lookup(lost).await.is_none() }
        })
        .await
    };
    assert!(purged, "sweep must purge shadows of vanished resources");
    assert!(directory.lookup(live).await.is_some());

    cancel_token.cancel();
    tokio::time::timeout(Duration::from_secs(2), sweep)
        .await
        .expect("sweep should stop after cancellation")
        .expect("sweep should not panic");
}

#[tokio::test]
async fn test_sweep_skips_records_while_oracle_is_down() {
    let registry = MockResourceRegistry::new();
    let directory = ShadowDirectory::new(Arc::new(registry.clone()));

    let rtc = registry.create_resource();
    directory
        .register(rtc, SessionId(1), location("mc-a"))
        .await
        .unwrap();
    registry.delete_resource_silently(rtc);
    registry.set_fail_lookups(true);

    let cancel_token = CancellationToken::new();
    let sweep = tokio::spawn(start_orphan_sweep(
        directory.clone(),
        Arc::new(registry.clone()),
        SweepConfig {
            check_interval_seconds: 1,
        },
        cancel_token.clone(),
    ));

    // With the oracle down the sweep must not guess: the record stays.
    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert!(directory.lookup(rtc).await.is_some());

    // Once the oracle recovers the orphan is purged.
    registry.set_fail_lookups(false);
    let purged = {
        let directory = directory.clone();
        wait_until(Duration::from_secs(5), move || {
            let directory = directory.clone();
            async move { directory.lookup(rtc).await.is_none() }
        })
        .await
    };
    assert!(purged);

    cancel_token.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(2), sweep).await;
}

#[tokio::test]
async fn test_cascade_and_reregistration_interleave_safely() {
    let (registry, events) = MockResourceRegistry::with_event_channel(32);
    let directory = ShadowDirectory::new(Arc::new(registry.clone()));

    let cancel_token = CancellationToken::new();
    let coordinator = tokio::spawn(start_cascade_coordinator(
        directory.clone(),
        events,
        cancel_token.clone(),
    ));

    // Churn: create, register, delete; the directory must end empty and
    // never hold a record for a deleted resource once events drain.
    let mut deleted = Vec::new();
    for i in 0..16_i64 {
        let rtc = registry.create_resource();
        directory
            .register(rtc, SessionId(i), location("mc-a"))
            .await
            .unwrap();
        registry.delete_resource(rtc).await;
        deleted.push(rtc);
    }

    let drained = {
        let directory = directory.clone();
        wait_until(Duration::from_secs(2), move || {
            let directory = directory.clone();
            async move { directory.is_empty().await }
        })
        .await
    };
    assert!(drained, "all shadows of deleted resources must be released");
    for rtc in deleted {
        assert!(directory.lookup(rtc).await.is_none());
    }

    cancel_token.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(2), coordinator).await;
}
