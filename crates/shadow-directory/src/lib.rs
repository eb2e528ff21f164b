//! Session Shadow Directory
//!
//! Tracks, for each active RTC resource, which cluster location currently
//! holds a live replica ("shadow") of that resource's session state.
//! Routing and failover logic query the directory to answer "which location
//! currently owns session S of resource R"; session-migration logic
//! registers ownership changes; resource teardown cascades into shadow
//! release.
//!
//! # Architecture
//!
//! ```text
//! session-management subsystem (external)
//! ├── creates/destroys RTC resources (ResourceRegistry oracle)
//! └── emits ResourceEvent::Deleted
//!         |
//!         v
//! cascade coordinator --release--> ShadowDirectory <--register/lookup-- migration & routing
//!                                        ^
//! orphan sweep --reconcile---------------+
//! ```
//!
//! # Key Design Decisions
//!
//! - **One shadow per resource**: registering a new shadow for a resource
//!   replaces the prior record (last-writer-wins, no history retained)
//! - **Triple uniqueness**: a (session, location) pairing belongs to at
//!   most one resource; collisions are hard conflicts, never overwrites
//! - **Single write scope**: uniqueness check and mutation happen under one
//!   write guard, so invariants hold under concurrent callers
//! - **Cascade plus sweep**: deletion events release shadows immediately;
//!   a periodic reconciliation sweep purges shadows whose resource
//!   disappeared without a notification
//!
//! # Modules
//!
//! - [`record`] - Shadow record value type
//! - [`directory`] - Authoritative record store with invariant enforcement
//! - [`registry`] - Resource existence oracle trait
//! - [`cascade`] - Deletion-event coordinator task
//! - [`sweep`] - Orphan reconciliation task
//! - [`errors`] - Error taxonomy
//! - [`observability`] - Metrics helpers

#![warn(clippy::pedantic)]

pub mod cascade;
pub mod directory;
pub mod errors;
pub mod observability;
pub mod record;
pub mod registry;
pub mod sweep;

// Re-export primary types
pub use cascade::{start_cascade_coordinator, ResourceEvent};
pub use directory::ShadowDirectory;
pub use errors::{DirectoryError, RegistryError};
pub use record::ShadowRecord;
pub use registry::ResourceRegistry;
pub use sweep::{start_orphan_sweep, SweepConfig};
