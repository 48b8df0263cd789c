//! Word-list loading.
//!
//! A dictionary file is plain text with one word per line. Lines are trimmed
//! and blank lines skipped; order is preserved.
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Ordered, immutable set of candidate words for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { words: words.into_iter().map(Into::into).collect() }
    }

    /// Read a dictionary, decoding invalid UTF-8 lossily rather than failing.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| Error::DictionaryRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Run-level loader: a missing or unreadable dictionary is logged and
    /// yields an empty vocabulary so the caller decides what that means.
    pub fn load_or_empty(path: &Path) -> Self {
        let vocabulary = match Self::from_file(path) {
            Ok(v) => v,
            Err(e) => {
                warn!(path = %path.display(), "{e}");
                Self::default()
            }
        };
        info!("Read {} dictionary words", vocabulary.len());
        vocabulary
    }

    fn parse(content: &str) -> Self {
        Self::from_words(content.lines().map(str::trim).filter(|l| !l.is_empty()))
    }

    pub fn words(&self) -> &[String] { &self.words }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn get(&self, index: usize) -> Option<&str> { self.words.get(index).map(String::as_str) }
}
