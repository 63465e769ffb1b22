// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod health;
pub mod metrics;
pub mod ranker;
pub mod sources;
pub mod topic;

// Test doubles for the adapter boundary; also used by the tests/ directory.
pub mod testing;

// ---- Re-exports for stable public API ----
pub use crate::aggregator::Aggregator;
pub use crate::api::{create_router, AppState};
pub use crate::error::SourceFailure;
pub use crate::fallback::FallbackProvider;
pub use crate::sources::{SourceAdapter, SourceRegistry};
pub use crate::topic::{AggregationRequest, Topic};
