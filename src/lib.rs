// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod config;
pub mod ingest;
pub mod pipeline;
pub mod snapshot;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{AnalysisConfig, Tokenizer, VelocityEntry};
pub use crate::ingest::types::{Fetcher, SourceBucket, SourceRecord};
pub use crate::pipeline::{run_once, Pipeline};
pub use crate::snapshot::{Snapshot, SnapshotStore};
