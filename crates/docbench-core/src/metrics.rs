//! Wall-clock timing and post-run engine statistics.
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{IndexEngine, StatsReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub live_docs: u64,
    pub deleted_docs: u64,
    pub duration_millis: u64,
}

impl fmt::Display for RunMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Num docs: {}", self.live_docs)?;
        writeln!(f, "Deleted docs: {}", self.deleted_docs)?;
        write!(f, "Duration (ms): {}", self.duration_millis)
    }
}

/// Started before the engine is opened, stopped once it is closed.
#[derive(Debug)]
pub struct RunTimer {
    start: Instant,
}

impl RunTimer {
    pub fn start() -> Self { Self { start: Instant::now() } }

    pub fn stop(self) -> Duration { self.start.elapsed() }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub fn millis(elapsed: Duration) -> u64 { u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX) }

/// Open a read-only view of the index and combine its counts with `elapsed`.
pub fn collect<E: IndexEngine>(engine: &E, index_path: &Path, elapsed: Duration) -> Result<RunMetrics> {
    let reader = engine.open_reader(index_path).map_err(|source| Error::ReadStats {
        path: index_path.to_path_buf(),
        source,
    })?;
    let metrics = RunMetrics {
        live_docs: reader.live_doc_count(),
        deleted_docs: reader.deleted_doc_count(),
        duration_millis: millis(elapsed),
    };
    reader.close();
    debug!(?metrics, "collected run metrics");
    Ok(metrics)
}
