use anyhow::Result;
use std::path::Path;
use tantivy::{Index, IndexReader, ReloadPolicy};

use docbench_core::traits::StatsReader;

use crate::tantivy_utils::register_tokenizer;

/// Read-only snapshot of an index taken after the writer has closed.
pub struct TantivyStats {
	reader: IndexReader,
}

impl TantivyStats {
	pub fn open(index_dir: &Path) -> Result<Self> {
		let index = Index::open_in_dir(index_dir)?;
		register_tokenizer(&index);
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		Ok(Self { reader })
	}

	pub fn segment_count(&self) -> usize { self.reader.searcher().segment_readers().len() }
}

impl StatsReader for TantivyStats {
	fn live_doc_count(&self) -> u64 { self.reader.searcher().num_docs() }

	fn deleted_doc_count(&self) -> u64 {
		self.reader.searcher().segment_readers().iter().map(|s| u64::from(s.num_deleted_docs())).sum()
	}

	fn close(self) {}
}
