//! Single-dash flag parsing layered over a loaded [`RunConfig`].
use std::path::PathBuf;
use std::str::FromStr;

use docbench_core::config::expand_path;
use docbench_core::{Error, OpenMode, RunConfig};

pub const USAGE: &str = "docbench-index [-help]
\t[-index INDEX_PATH]
\t[-num_docs NUM_DOCS]
\t[-update]
\t[-docs_per_segment DOCS_PER_SEGMENT]
\t[-info_stream INFO_STREAM_FILE]
\t[-dict DICT_FILE]
\t[-disable_compound_file]
\t[-sentence_length WORDS]
\t[-seed SEED]
\t[-ram_buffer_mb MB]
\t[-json]
\t[-quiet]";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Run(Invocation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub config: RunConfig,
    pub json: bool,
    pub quiet: bool,
}

/// One command-line override, held until the base config is loaded.
#[derive(Debug, Clone, PartialEq)]
enum Setting {
    Index(PathBuf),
    NumDocs(u64),
    DocsPerSegment(usize),
    Update,
    InfoStream(PathBuf),
    Dict(PathBuf),
    DisableCompoundFile,
    SentenceLength(usize),
    Seed(u64),
    RamBufferMb(usize),
}

impl Setting {
    fn apply(self, config: &mut RunConfig) {
        match self {
            Setting::Index(path) => config.index_path = path,
            Setting::NumDocs(n) => config.num_docs = n,
            Setting::DocsPerSegment(n) => config.docs_per_segment = n,
            Setting::Update => config.mode = OpenMode::CreateOrAppend,
            Setting::InfoStream(path) => config.info_stream = Some(path),
            Setting::Dict(path) => config.dictionary_path = path,
            Setting::DisableCompoundFile => config.compound_file = false,
            Setting::SentenceLength(n) => config.sentence_length = n,
            Setting::Seed(seed) => config.seed = Some(seed),
            Setting::RamBufferMb(mb) => config.ram_buffer_mb = mb,
        }
    }
}

/// Parse `args` (without the program name), then apply them on top of the
/// config returned by `load`.
///
/// `load` runs only once the arguments are known to be a run request, so
/// `-help` and usage errors never depend on the config files.
pub fn parse<I, F>(args: I, load: F) -> Result<Command, Error>
where
    I: IntoIterator<Item = String>,
    F: FnOnce() -> Result<RunConfig, Error>,
{
    let mut settings = Vec::new();
    let mut json = false;
    let mut quiet = false;
    let mut args = args.into_iter();
    while let Some(flag) = args.next() {
        let setting = match flag.as_str() {
            "-index" => Setting::Index(path_value(&flag, args.next())?),
            "-num_docs" => Setting::NumDocs(number(&flag, args.next())?),
            "-docs_per_segment" => Setting::DocsPerSegment(number(&flag, args.next())?),
            "-update" => Setting::Update,
            "-info_stream" => Setting::InfoStream(path_value(&flag, args.next())?),
            "-dict" => Setting::Dict(path_value(&flag, args.next())?),
            "-disable_compound_file" => Setting::DisableCompoundFile,
            "-sentence_length" => Setting::SentenceLength(number(&flag, args.next())?),
            "-seed" => Setting::Seed(number(&flag, args.next())?),
            "-ram_buffer_mb" => Setting::RamBufferMb(number(&flag, args.next())?),
            "-json" => { json = true; continue; }
            "-quiet" => { quiet = true; continue; }
            "-help" => return Ok(Command::Help),
            other => return Err(Error::InvalidConfig(format!("unsupported parameter {other}"))),
        };
        settings.push(setting);
    }

    let mut config = load()?;
    for setting in settings {
        setting.apply(&mut config);
    }
    config.validate()?;
    Ok(Command::Run(Invocation { config, json, quiet }))
}

fn value(flag: &str, value: Option<String>) -> Result<String, Error> {
    value.ok_or_else(|| Error::InvalidConfig(format!("{flag} requires a value")))
}

fn path_value(flag: &str, raw: Option<String>) -> Result<PathBuf, Error> {
    Ok(expand_path(value(flag, raw)?))
}

fn number<T: FromStr>(flag: &str, raw: Option<String>) -> Result<T, Error> {
    let raw = value(flag, raw)?;
    raw.parse().map_err(|_| Error::InvalidConfig(format!("{flag} expects a non-negative integer, got {raw:?}")))
}
