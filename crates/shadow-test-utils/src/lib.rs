//! # Shadow Directory Test Utilities
//!
//! Shared test utilities for the session shadow directory.
//!
//! This crate provides mock implementations and test fixtures for isolated
//! directory testing without a real session-management subsystem.
//!
//! ## Modules
//!
//! - `mock_registry` - In-memory resource-management subsystem: existence
//!   oracle plus deletion event feed
//! - `fixtures` - Pre-validated identifiers for terse test setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shadow_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     // Mock subsystem wired to a deletion event channel
//!     let (registry, events) = MockResourceRegistry::with_event_channel(8);
//!     let directory = ShadowDirectory::new(Arc::new(registry.clone()));
//!
//!     let rtc = registry.create_resource();
//!     directory.register(rtc, SessionId(100), location("mc-a")).await?;
//!
//!     // Deleting the resource emits ResourceEvent::Deleted on `events`
//!     registry.delete_resource(rtc).await;
//! }
//! ```

pub mod fixtures;
pub mod mock_registry;

pub use fixtures::location;
pub use mock_registry::MockResourceRegistry;
