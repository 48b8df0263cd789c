//! docbench-core
//!
//! Engine-agnostic pieces of the synthetic indexing benchmark: vocabulary
//! loading, sentence generation, document building, the ingestion driver and
//! the metrics it reports. Concrete engines plug in through [`traits`].
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod dictionary;
pub mod document;
pub mod driver;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod sentence;
pub mod traits;
pub mod types;

pub use config::{EngineSettings, OpenMode, RunConfig};
pub use dictionary::Vocabulary;
pub use driver::{run_benchmark, run_benchmark_with_progress, IndexingDriver};
pub use error::{Error, Result};
pub use metrics::RunMetrics;
pub use sentence::{Sentence, SentenceGenerator};
pub use types::Document;
