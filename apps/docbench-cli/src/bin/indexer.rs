use std::env;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use docbench_cli::args::{self, Command, USAGE};
use docbench_core::config::RunConfig;
use docbench_core::{logging, run_benchmark_with_progress};
use docbench_text::TantivyEngine;

fn main() {
    let invocation = match args::parse(env::args().skip(1), RunConfig::load) {
        Ok(Command::Help) => { println!("{USAGE}"); std::process::exit(0); }
        Ok(Command::Run(invocation)) => invocation,
        Err(e) => { eprintln!("{e}\n\nUsage: {USAGE}"); std::process::exit(2); }
    };
    logging::init(invocation.config.info_stream.as_deref());

    if let Err(e) = run(&invocation) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(invocation: &args::Invocation) -> anyhow::Result<()> {
    let config = &invocation.config;
    info!(index = %config.index_path.display(), dict = %config.dictionary_path.display(), "docbench indexing run");

    let progress = if invocation.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(config.num_docs);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} docs ({per_sec}) {msg}")?
                .progress_chars("#>-"),
        );
        pb
    };

    let metrics = run_benchmark_with_progress(&TantivyEngine::new(), config, progress)?;
    if invocation.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("{metrics}");
    }
    Ok(())
}
