//! docbench-text
//!
//! Tantivy-backed implementation of the benchmark's engine traits. See
//! `index` for the writer side and `stats` for the post-run reader; the
//! example under `examples/` runs a small ingestion during development.
pub mod tantivy_utils;
pub mod index;
pub mod stats;

pub use index::{TantivyEngine, TantivyHandle};
pub use stats::TantivyStats;
