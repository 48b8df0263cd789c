use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tantivy::directory::MmapDirectory;
use tantivy::schema::Field;
use tantivy::store::Compressor;
use tantivy::{doc, Index, IndexSettings, IndexWriter, Term};
use tracing::{debug, info};

use docbench_core::config::{EngineSettings, OpenMode};
use docbench_core::traits::{IndexEngine, IndexHandle};
use docbench_core::types::{Document, ID_FIELD, TEXT_FIELD};

use crate::stats::TantivyStats;
use crate::tantivy_utils::{build_schema, register_tokenizer};

/// Smallest per-thread writer budget tantivy accepts.
pub const MIN_MEMORY_BUDGET: usize = 15_000_000;
/// Stays below tantivy's per-thread ceiling of `u32::MAX` minus its margin.
pub const MAX_MEMORY_BUDGET: usize = 4_000_000_000;

/// Index metadata file; its presence marks a directory as a tantivy index.
pub const META_FILE: &str = "meta.json";
/// Tantivy's list of every file it has written into the directory.
pub const MANAGED_FILE: &str = ".managed.json";

/// Opens tantivy indexes on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct TantivyEngine;

impl TantivyEngine {
	pub fn new() -> Self { Self }

	/// Replaces any previous index in `path`; files tantivy did not write are kept.
	fn create(path: &Path, settings: &EngineSettings) -> Result<Index> {
		std::fs::create_dir_all(path).with_context(|| format!("creating {}", path.display()))?;
		remove_index_files(path)?;
		let dir = MmapDirectory::open(path)?;
		Ok(Index::create(dir, build_schema(), index_settings(settings))?)
	}

	fn open_or_create(path: &Path, settings: &EngineSettings) -> Result<Index> {
		std::fs::create_dir_all(path).with_context(|| format!("creating {}", path.display()))?;
		let dir = MmapDirectory::open(path)?;
		Ok(Index::builder().schema(build_schema()).settings(index_settings(settings)).open_or_create(dir)?)
	}
}

/// Delete the files listed in `.managed.json`, then the metadata files themselves.
pub fn remove_index_files(path: &Path) -> Result<usize> {
	let managed = path.join(MANAGED_FILE);
	let mut files: Vec<PathBuf> = match std::fs::read(&managed) {
		Ok(bytes) => serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", managed.display()))?,
		Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
		Err(e) => return Err(e).with_context(|| format!("reading {}", managed.display())),
	};
	files.extend([META_FILE, MANAGED_FILE].map(PathBuf::from));
	let mut removed = 0;
	for file in files {
		// Managed entries are bare file names; anything else is not ours to delete.
		if file.components().count() != 1 || file.is_absolute() { continue; }
		let target = path.join(&file);
		match std::fs::remove_file(&target) {
			Ok(()) => removed += 1,
			Err(e) if e.kind() == ErrorKind::NotFound => {}
			Err(e) => return Err(e).with_context(|| format!("removing {}", target.display())),
		}
	}
	debug!(path = %path.display(), removed, "removed previous index files");
	Ok(removed)
}

/// Tantivy has no compound-file container; the closest packaging knob is the
/// doc store, which is LZ4-compressed when compound files are enabled.
pub fn index_settings(settings: &EngineSettings) -> IndexSettings {
	let docstore_compression = if settings.compound_file { Compressor::Lz4 } else { Compressor::None };
	IndexSettings { docstore_compression, ..IndexSettings::default() }
}

pub fn memory_budget(settings: &EngineSettings) -> usize {
	settings.ram_buffer_bytes.clamp(MIN_MEMORY_BUDGET, MAX_MEMORY_BUDGET)
}

impl IndexEngine for TantivyEngine {
	type Handle = TantivyHandle;
	type Reader = TantivyStats;

	fn open(&self, path: &Path, mode: OpenMode, settings: &EngineSettings) -> Result<TantivyHandle> {
		let index = match mode {
			OpenMode::Create => Self::create(path, settings)?,
			OpenMode::CreateOrAppend => Self::open_or_create(path, settings)?,
		};
		register_tokenizer(&index);
		let schema = index.schema();
		let id_field = schema.get_field(ID_FIELD)?;
		let text_field = schema.get_field(TEXT_FIELD)?;
		let budget = memory_budget(settings);
		// A single indexing thread keeps segment boundaries at `docs_per_segment`.
		let writer: IndexWriter = index.writer_with_num_threads(1, budget)?;
		info!(path = %path.display(), ?mode, budget, docs_per_segment = settings.docs_per_segment, compound_file = settings.compound_file, "opened index writer");
		Ok(TantivyHandle { writer, id_field, text_field, docs_per_segment: settings.docs_per_segment, buffered: 0, segments_flushed: 0 })
	}

	fn open_reader(&self, path: &Path) -> Result<TantivyStats> {
		TantivyStats::open(path)
	}
}

/// A live writer. Dropping it without `close` discards buffered documents.
pub struct TantivyHandle {
	writer: IndexWriter,
	id_field: Field,
	text_field: Field,
	docs_per_segment: usize,
	buffered: usize,
	segments_flushed: usize,
}

impl TantivyHandle {
	fn add(&mut self, doc: Document) -> Result<()> {
		self.writer.add_document(doc!(self.id_field => doc.id, self.text_field => doc.text))?;
		self.buffered += 1;
		if self.buffered >= self.docs_per_segment { self.flush()?; }
		Ok(())
	}

	fn flush(&mut self) -> Result<()> {
		let opstamp = self.writer.commit()?;
		self.segments_flushed += 1;
		debug!(opstamp, docs = self.buffered, segments = self.segments_flushed, "flushed segment");
		self.buffered = 0;
		Ok(())
	}
}

impl IndexHandle for TantivyHandle {
	fn insert(&mut self, doc: Document) -> Result<()> {
		self.add(doc)
	}

	fn upsert(&mut self, id_field: &str, id_value: &str, doc: Document) -> Result<()> {
		let field = if id_field == ID_FIELD { self.id_field } else { self.writer.index().schema().get_field(id_field)? };
		// Deletes only hit documents with an earlier opstamp, so `doc` survives.
		self.writer.delete_term(Term::from_field_text(field, id_value));
		self.add(doc)
	}

	fn close(mut self) -> Result<()> {
		if self.buffered > 0 { self.flush()?; } else { self.writer.commit()?; }
		debug!(segments = self.segments_flushed, "waiting for merges");
		self.writer.wait_merging_threads()?;
		Ok(())
	}
}
