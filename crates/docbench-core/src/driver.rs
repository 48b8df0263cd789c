//! The generate → build → submit loop.
//!
//! One run walks `Init → Ingesting → Finalizing → Done`; any engine error
//! ends it in `Failed` with the index path attached. Nothing is retried.
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::{OpenMode, RunConfig};
use crate::dictionary::Vocabulary;
use crate::document;
use crate::error::{Error, Result};
use crate::metrics::{self, RunMetrics, RunTimer};
use crate::sentence::SentenceGenerator;
use crate::traits::{IndexEngine, IndexHandle};
use crate::types::ID_FIELD;

pub struct IndexingDriver<'a, E: IndexEngine> {
    engine: &'a E,
    config: &'a RunConfig,
    progress: ProgressBar,
}

impl<'a, E: IndexEngine> IndexingDriver<'a, E> {
    pub fn new(engine: &'a E, config: &'a RunConfig) -> Self {
        Self { engine, config, progress: ProgressBar::hidden() }
    }

    /// Tick `progress` once per submitted document. Its length is set here.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        progress.set_length(self.config.num_docs);
        self.progress = progress;
        self
    }

    /// Run the full ingestion and return the post-run statistics.
    ///
    /// On failure the progress bar is abandoned so it does not linger above the error.
    pub fn run<R: Rng + ?Sized>(&self, vocabulary: &Vocabulary, rng: &mut R) -> Result<RunMetrics> {
        let result = self.ingest(vocabulary, rng);
        if result.is_err() {
            self.progress.abandon();
        }
        result
    }

    fn ingest<R: Rng + ?Sized>(&self, vocabulary: &Vocabulary, rng: &mut R) -> Result<RunMetrics> {
        let config = self.config;
        let generator = SentenceGenerator::new(vocabulary, config.sentence_length);
        // Refuse before opening, so a doomed Create run leaves the old index alone.
        if config.num_docs > 0 && generator.length() > 0 && vocabulary.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        let timer = RunTimer::start();
        let mut handle = self
            .engine
            .open(&config.index_path, config.mode, &config.engine_settings())
            .map_err(|source| Error::Open { path: config.index_path.clone(), source })?;
        info!(path = %config.index_path.display(), mode = ?config.mode, num_docs = config.num_docs, "ingesting");

        for sequence_index in 0..config.num_docs {
            let sentence = generator.generate(rng)?;
            let doc = document::build(sequence_index, &sentence);
            let submitted = match config.mode {
                OpenMode::Create => handle.insert(doc),
                OpenMode::CreateOrAppend => {
                    let id = doc.id.clone();
                    handle.upsert(ID_FIELD, &id, doc)
                }
            };
            submitted.map_err(|e| self.indexing_error(e))?;
            self.progress.inc(1);
        }

        debug!("closing index handle");
        handle.close().map_err(|e| self.indexing_error(e))?;
        let elapsed = timer.stop();
        self.progress.finish_and_clear();
        info!(elapsed_ms = metrics::millis(elapsed), "ingestion finished");

        metrics::collect(self.engine, &config.index_path, elapsed)
    }

    fn indexing_error(&self, source: anyhow::Error) -> Error {
        Error::Indexing { path: self.config.index_path.clone(), source }
    }
}

/// Load the vocabulary, seed the random source and run one benchmark.
///
/// Holds no process-wide state, so repeated calls in one process are independent.
pub fn run_benchmark<E: IndexEngine>(engine: &E, config: &RunConfig) -> Result<RunMetrics> {
    run_benchmark_with_progress(engine, config, ProgressBar::hidden())
}

pub fn run_benchmark_with_progress<E: IndexEngine>(
    engine: &E,
    config: &RunConfig,
    progress: ProgressBar,
) -> Result<RunMetrics> {
    config.validate()?;
    let vocabulary = Vocabulary::load_or_empty(&config.dictionary_path);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    IndexingDriver::new(engine, config).with_progress(progress).run(&vocabulary, &mut rng)
}
