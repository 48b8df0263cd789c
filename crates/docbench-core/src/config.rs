use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_DICTIONARY: &str = "/usr/share/dict/words";
pub const DEFAULT_SENTENCE_LENGTH: usize = 100;

/// How the engine handle is opened, and with it how documents are submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    /// Recreate the index from scratch and insert every document.
    #[default]
    Create,
    /// Open an existing index (or create one) and upsert by id.
    CreateOrAppend,
}

/// Everything one benchmark run needs. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub index_path: PathBuf,
    pub num_docs: u64,
    pub docs_per_segment: usize,
    pub mode: OpenMode,
    pub ram_buffer_mb: usize,
    pub compound_file: bool,
    pub info_stream: Option<PathBuf>,
    pub dictionary_path: PathBuf,
    pub sentence_length: usize,
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("index"),
            num_docs: 100_000,
            docs_per_segment: 100_000,
            mode: OpenMode::Create,
            // Large enough that the document threshold is hit first.
            ram_buffer_mb: 1024,
            compound_file: true,
            info_stream: None,
            dictionary_path: PathBuf::from(DEFAULT_DICTIONARY),
            sentence_length: DEFAULT_SENTENCE_LENGTH,
            seed: None,
        }
    }
}

/// The buffering knobs forwarded verbatim to the engine on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub docs_per_segment: usize,
    pub ram_buffer_bytes: usize,
    pub compound_file: bool,
}

impl RunConfig {
    /// Merge defaults, `docbench.toml`, `docbench.<RUST_ENV>.toml` and
    /// `DOCBENCH_*` environment variables. Command-line flags are applied by
    /// the caller on top of the returned value.
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::from_figment(Self::figment(&env_name))
    }

    pub fn figment(env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(RunConfig::default()))
            .merge(Toml::file("docbench.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("docbench.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("docbench.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("docbench.test.toml")),
            _ => {}
        }
        figment.merge(Env::prefixed("DOCBENCH_"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: RunConfig = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.index_path = expand_path(config.index_path.to_string_lossy());
        config.dictionary_path = expand_path(config.dictionary_path.to_string_lossy());
        config.info_stream = config.info_stream.map(|p| expand_path(p.to_string_lossy()));
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.docs_per_segment == 0 {
            return Err(Error::InvalidConfig("docs_per_segment must be at least 1".into()));
        }
        if self.ram_buffer_mb == 0 {
            return Err(Error::InvalidConfig("ram_buffer_mb must be at least 1".into()));
        }
        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            docs_per_segment: self.docs_per_segment,
            ram_buffer_bytes: self.ram_buffer_mb.saturating_mul(1 << 20),
            compound_file: self.compound_file,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
