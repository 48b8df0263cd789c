//! Subscriber setup shared by binaries.
//!
//! Console output goes to stderr under `RUST_LOG` (default `info`). An info
//! stream, when requested, receives engine diagnostics only: the `tantivy`
//! crate's `log` records (bridged into tracing) and the adapter's own events.
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing::{warn, Level};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Targets whose events make up the engine diagnostic stream.
pub const ENGINE_TARGETS: [&str; 2] = ["tantivy", "docbench_text"];

pub fn info_stream_filter() -> Targets {
    ENGINE_TARGETS
        .iter()
        .fold(Targets::new(), |targets, target| targets.with_target(*target, Level::TRACE))
}

/// Install the global subscriber. Failing to open the info stream is not
/// fatal: it is reported and the run continues without it.
pub fn init(info_stream: Option<&Path>) {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let mut open_error = None;
    let stream = info_stream.and_then(|path| match File::create(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(info_stream_filter()),
        ),
        Err(e) => {
            open_error = Some((path.to_path_buf(), e));
            None
        }
    });

    // A subscriber may already be installed (tests, embedding callers).
    let _ = tracing_subscriber::registry().with(console).with(stream).try_init();

    if let Some((path, e)) = open_error {
        warn!("Error opening info stream on file {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_stream_filter_keeps_engine_targets_only() {
        let filter = info_stream_filter();
        assert!(filter.would_enable("tantivy::indexer::index_writer", &Level::DEBUG));
        assert!(filter.would_enable("docbench_text::index", &Level::TRACE));
        assert!(!filter.would_enable("docbench_core::driver", &Level::INFO));
    }

    #[test]
    fn unwritable_info_stream_is_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        init(Some(&dir.path().join("missing/dir/stream.log")));
    }
}
