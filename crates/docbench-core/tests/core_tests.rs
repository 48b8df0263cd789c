use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use docbench_core::traits::{IndexEngine, IndexHandle, StatsReader};
use docbench_core::{
    run_benchmark, Document, EngineSettings, Error, IndexingDriver, OpenMode, RunConfig, Vocabulary,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Open(OpenMode, EngineSettings),
    Insert(Document),
    Upsert(String, String, Document),
    Close,
}

/// In-memory engine that records every call and keeps one map per path.
#[derive(Default, Clone)]
struct RecordingEngine {
    calls: Rc<RefCell<Vec<Call>>>,
    indexes: Rc<RefCell<BTreeMap<PathBuf, Vec<Document>>>>,
    fail_open: bool,
    fail_insert_at: Option<usize>,
    fail_reader: bool,
}

struct RecordingHandle {
    engine: RecordingEngine,
    path: PathBuf,
    buffered: Vec<(Option<String>, Document)>,
}

struct RecordingReader {
    live: u64,
    deleted: u64,
}

impl RecordingEngine {
    fn calls(&self) -> Vec<Call> { self.calls.borrow().clone() }

    fn submitted_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Insert(d) | Call::Upsert(_, _, d) => Some(d.id),
                _ => None,
            })
            .collect()
    }
}

impl IndexEngine for RecordingEngine {
    type Handle = RecordingHandle;
    type Reader = RecordingReader;

    fn open(&self, path: &Path, mode: OpenMode, settings: &EngineSettings) -> anyhow::Result<Self::Handle> {
        if self.fail_open {
            anyhow::bail!("permission denied");
        }
        self.calls.borrow_mut().push(Call::Open(mode, *settings));
        let mut indexes = self.indexes.borrow_mut();
        let docs = indexes.entry(path.to_path_buf()).or_default();
        if mode == OpenMode::Create {
            docs.clear();
        }
        Ok(RecordingHandle { engine: self.clone(), path: path.to_path_buf(), buffered: Vec::new() })
    }

    fn open_reader(&self, path: &Path) -> anyhow::Result<Self::Reader> {
        if self.fail_reader {
            anyhow::bail!("index is corrupt");
        }
        let indexes = self.indexes.borrow();
        let live = indexes.get(path).map_or(0, Vec::len) as u64;
        Ok(RecordingReader { live, deleted: 0 })
    }
}

impl IndexHandle for RecordingHandle {
    fn insert(&mut self, doc: Document) -> anyhow::Result<()> {
        let n = self.engine.submitted_ids().len();
        if self.engine.fail_insert_at == Some(n) {
            anyhow::bail!("disk full");
        }
        self.engine.calls.borrow_mut().push(Call::Insert(doc.clone()));
        self.buffered.push((None, doc));
        Ok(())
    }

    fn upsert(&mut self, id_field: &str, id_value: &str, doc: Document) -> anyhow::Result<()> {
        self.engine
            .calls
            .borrow_mut()
            .push(Call::Upsert(id_field.to_string(), id_value.to_string(), doc.clone()));
        self.buffered.push((Some(id_value.to_string()), doc));
        Ok(())
    }

    fn close(self) -> anyhow::Result<()> {
        self.engine.calls.borrow_mut().push(Call::Close);
        let mut indexes = self.engine.indexes.borrow_mut();
        let docs = indexes.entry(self.path).or_default();
        for (key, doc) in self.buffered {
            if let Some(key) = key {
                docs.retain(|d| d.id != key);
            }
            docs.push(doc);
        }
        Ok(())
    }
}

impl StatsReader for RecordingReader {
    fn live_doc_count(&self) -> u64 { self.live }
    fn deleted_doc_count(&self) -> u64 { self.deleted }
    fn close(self) {}
}

fn config(num_docs: u64, mode: OpenMode) -> RunConfig {
    RunConfig {
        index_path: PathBuf::from("mem-index"),
        num_docs,
        docs_per_segment: 10,
        mode,
        sentence_length: 2,
        seed: Some(42),
        ..RunConfig::default()
    }
}

fn vocab() -> Vocabulary { Vocabulary::from_words(["a", "b"]) }

#[test]
fn create_mode_inserts_ids_in_increasing_order() {
    let engine = RecordingEngine::default();
    let cfg = config(3, OpenMode::Create);
    let metrics = IndexingDriver::new(&engine, &cfg)
        .run(&vocab(), &mut StdRng::seed_from_u64(42))
        .expect("run");

    assert_eq!(engine.submitted_ids(), ["0", "1", "2"]);
    assert_eq!(metrics.live_docs, 3);
    assert_eq!(metrics.deleted_docs, 0);

    let calls = engine.calls();
    assert_eq!(calls.first(), Some(&Call::Open(OpenMode::Create, cfg.engine_settings())));
    assert_eq!(calls.last(), Some(&Call::Close));
    for call in &calls[1..calls.len() - 1] {
        let Call::Insert(doc) = call else { panic!("expected insert, got {call:?}") };
        let words: Vec<&str> = doc.text.split(' ').collect();
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| *w == "a" || *w == "b"));
    }
}

#[test]
fn create_or_append_upserts_by_id_field() {
    let engine = RecordingEngine::default();
    let cfg = config(4, OpenMode::CreateOrAppend);
    IndexingDriver::new(&engine, &cfg).run(&vocab(), &mut StdRng::seed_from_u64(1)).expect("run");

    let upserts: Vec<(String, String)> = engine
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Upsert(field, value, doc) => {
                assert_eq!(value, doc.id);
                Some((field, value))
            }
            Call::Insert(_) => panic!("no inserts in append mode"),
            _ => None,
        })
        .collect();
    assert_eq!(upserts.len(), 4);
    assert!(upserts.iter().all(|(field, _)| field == "id"));
}

#[test]
fn repeated_append_runs_keep_one_document_per_id() {
    let engine = RecordingEngine::default();
    let cfg = config(5, OpenMode::CreateOrAppend);
    for seed in [1, 2] {
        let metrics = IndexingDriver::new(&engine, &cfg)
            .run(&vocab(), &mut StdRng::seed_from_u64(seed))
            .expect("run");
        assert_eq!(metrics.live_docs, 5);
    }
}

#[test]
fn zero_documents_is_a_successful_empty_run() {
    let engine = RecordingEngine::default();
    let cfg = config(0, OpenMode::Create);
    let metrics = IndexingDriver::new(&engine, &cfg)
        .run(&Vocabulary::default(), &mut StdRng::seed_from_u64(0))
        .expect("run");
    assert!(engine.submitted_ids().is_empty());
    assert_eq!(metrics.live_docs, 0);
    assert_eq!(engine.calls().last(), Some(&Call::Close));
}

#[test]
fn empty_vocabulary_fails_before_the_index_is_touched() {
    let engine = RecordingEngine::default();
    let cfg = config(2, OpenMode::Create);
    let err = IndexingDriver::new(&engine, &cfg)
        .run(&Vocabulary::default(), &mut StdRng::seed_from_u64(0))
        .expect_err("must fail");
    assert!(matches!(err, Error::EmptyVocabulary));
    assert!(engine.calls().is_empty());
}

#[test]
fn open_failure_names_the_index_path() {
    let engine = RecordingEngine { fail_open: true, ..RecordingEngine::default() };
    let cfg = config(1, OpenMode::Create);
    let err = IndexingDriver::new(&engine, &cfg)
        .run(&vocab(), &mut StdRng::seed_from_u64(0))
        .expect_err("must fail");
    assert!(matches!(&err, Error::Open { path, .. } if path == Path::new("mem-index")));
    assert!(err.to_string().contains("mem-index"));
}

#[test]
fn submission_failure_is_an_indexing_error_and_skips_close() {
    let engine = RecordingEngine { fail_insert_at: Some(1), ..RecordingEngine::default() };
    let cfg = config(3, OpenMode::Create);
    let err = IndexingDriver::new(&engine, &cfg)
        .run(&vocab(), &mut StdRng::seed_from_u64(0))
        .expect_err("must fail");
    assert!(matches!(err, Error::Indexing { .. }));
    assert!(err.to_string().starts_with("Error indexing documents to mem-index"));
    assert_eq!(engine.submitted_ids(), ["0"]);
    assert!(!engine.calls().contains(&Call::Close));
}

#[test]
fn failed_run_leaves_no_progress_bar_running() {
    let engine = RecordingEngine { fail_insert_at: Some(1), ..RecordingEngine::default() };
    let cfg = config(3, OpenMode::Create);
    let progress = ProgressBar::hidden();
    let result = IndexingDriver::new(&engine, &cfg)
        .with_progress(progress.clone())
        .run(&vocab(), &mut StdRng::seed_from_u64(0));
    assert!(result.is_err());
    assert!(progress.is_finished());
    assert_eq!(progress.position(), 1);
}

#[test]
fn successful_run_finishes_progress_at_num_docs() {
    let engine = RecordingEngine::default();
    let cfg = config(4, OpenMode::Create);
    let progress = ProgressBar::hidden();
    IndexingDriver::new(&engine, &cfg)
        .with_progress(progress.clone())
        .run(&vocab(), &mut StdRng::seed_from_u64(0))
        .expect("run");
    assert!(progress.is_finished());
    assert_eq!(progress.position(), 4);
}

#[test]
fn reader_failure_is_reported_separately() {
    let engine = RecordingEngine { fail_reader: true, ..RecordingEngine::default() };
    let cfg = config(2, OpenMode::Create);
    let err = IndexingDriver::new(&engine, &cfg)
        .run(&vocab(), &mut StdRng::seed_from_u64(0))
        .expect_err("must fail");
    assert!(matches!(err, Error::ReadStats { .. }));
    assert_eq!(engine.submitted_ids().len(), 2);
}

#[test]
fn same_seed_produces_same_documents() {
    let cfg = RunConfig { sentence_length: 8, ..config(10, OpenMode::Create) };
    let words = Vocabulary::from_words(["one", "two", "three", "four", "five"]);
    let texts = |seed| {
        let engine = RecordingEngine::default();
        IndexingDriver::new(&engine, &cfg).run(&words, &mut StdRng::seed_from_u64(seed)).expect("run");
        engine
            .calls()
            .into_iter()
            .filter_map(|c| if let Call::Insert(d) = c { Some(d.text) } else { None })
            .collect::<Vec<_>>()
    };
    assert_eq!(texts(9), texts(9));
}

#[test]
fn run_benchmark_reads_dictionary_from_disk() {
    let tmp = TempDir::new().unwrap();
    let dict = tmp.path().join("words");
    let mut f = fs::File::create(&dict).unwrap();
    writeln!(f, "alpha\n\n  bravo  \n").unwrap();

    let engine = RecordingEngine::default();
    let cfg = RunConfig { dictionary_path: dict, ..config(3, OpenMode::Create) };
    let metrics = run_benchmark(&engine, &cfg).expect("run");
    assert_eq!(metrics.live_docs, 3);
    assert!(engine.calls().iter().all(|c| match c {
        Call::Insert(d) => d.text.split(' ').all(|w| w == "alpha" || w == "bravo"),
        _ => true,
    }));
}

#[test]
fn missing_dictionary_degrades_to_empty_vocabulary() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("no-such-words");
    assert!(matches!(Vocabulary::from_file(&missing), Err(Error::DictionaryRead { .. })));
    assert!(Vocabulary::load_or_empty(&missing).is_empty());

    let engine = RecordingEngine::default();
    let cfg = RunConfig { dictionary_path: missing, ..config(1, OpenMode::Create) };
    assert!(matches!(run_benchmark(&engine, &cfg), Err(Error::EmptyVocabulary)));
}

#[test]
fn dictionary_with_invalid_utf8_still_loads() {
    let tmp = TempDir::new().unwrap();
    let dict = tmp.path().join("latin1");
    fs::write(&dict, b"caf\xe9\nzoo\n").unwrap();
    let v = Vocabulary::from_file(&dict).expect("lossy load");
    assert_eq!(v.len(), 2);
    assert_eq!(v.get(1), Some("zoo"));
}
