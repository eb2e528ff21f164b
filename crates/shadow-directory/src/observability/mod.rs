//! Observability for the shadow directory.
//!
//! Metrics use the `metrics` facade; the embedding service decides which
//! recorder/exporter to install.

pub mod metrics;
