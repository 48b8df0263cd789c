use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Error opening directory {}: {:#}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Dictionary words file {} not found: {}", .path.display(), .source)]
    DictionaryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot generate a sentence from an empty vocabulary")]
    EmptyVocabulary,

    #[error("Error indexing documents to {}: {:#}", .path.display(), .source)]
    Indexing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Error reading from {}: {:#}", .path.display(), .source)]
    ReadStats {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
