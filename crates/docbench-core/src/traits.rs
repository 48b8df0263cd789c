//! The capability an index engine must offer to be benchmarked.
//!
//! Adapters report failures as `anyhow::Error`; the driver attaches the phase
//! and index path when turning them into [`crate::Error`].
use std::path::Path;

use crate::config::{EngineSettings, OpenMode};
use crate::types::Document;

pub trait IndexEngine {
    type Handle: IndexHandle;
    type Reader: StatsReader;

    /// `Create` must discard any existing index at `path`; `CreateOrAppend`
    /// opens it, creating a fresh one when absent.
    fn open(&self, path: &Path, mode: OpenMode, settings: &EngineSettings) -> anyhow::Result<Self::Handle>;

    fn open_reader(&self, path: &Path) -> anyhow::Result<Self::Reader>;
}

pub trait IndexHandle {
    fn insert(&mut self, doc: Document) -> anyhow::Result<()>;

    /// Replace every document whose `id_field` equals `id_value` with `doc`.
    fn upsert(&mut self, id_field: &str, id_value: &str, doc: Document) -> anyhow::Result<()>;

    /// Make everything submitted so far durable and visible to new readers.
    fn close(self) -> anyhow::Result<()>;
}

pub trait StatsReader {
    fn live_doc_count(&self) -> u64;
    fn deleted_doc_count(&self) -> u64;
    fn close(self);
}
