use std::env;
use std::path::{Path, PathBuf};

use docbench_core::{run_benchmark, OpenMode, RunConfig};
use docbench_text::TantivyEngine;

// Run a small synthetic ingestion against a scratch Tantivy index.
// Usage:
//   cargo run -p docbench-text --example index -- [--index ../dev_data/indexes/bench] [--num-docs 1000] [--update]
// Notes:
//   - Without --update the target index directory is recreated.
//   - Defaults resolve relative to the workspace root so you can run from anywhere.

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut index_dir: Option<PathBuf> = None;
    let mut num_docs: u64 = 1_000;
    let mut mode = OpenMode::Create;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--index" => {
                if i + 1 >= args.len() { eprintln!("--index requires a path"); std::process::exit(2); }
                index_dir = Some(PathBuf::from(&args[i + 1]));
                i += 2; continue;
            }
            "--num-docs" => {
                if i + 1 >= args.len() { eprintln!("--num-docs requires a number"); std::process::exit(2); }
                num_docs = args[i + 1].parse().unwrap_or(num_docs);
                i += 2; continue;
            }
            "--update" => { mode = OpenMode::CreateOrAppend; i += 1; continue; }
            s => {
                eprintln!("Unknown flag: {}", s); std::process::exit(2);
            }
        }
    }

    let ws_root = Path::new(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap_or(Path::new("."));
    let index_path = index_dir
        .or_else(|| env::var("BENCH_INDEX_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| ws_root.join("dev_data/indexes/bench"));

    println!("Tantivy synthetic ingest\n========================");
    println!("Index dir: {}", index_path.display());

    let config = RunConfig { index_path, num_docs, mode, docs_per_segment: 250, ..RunConfig::default() };
    let metrics = run_benchmark(&TantivyEngine::new(), &config)?;
    println!("{metrics}");
    Ok(())
}
