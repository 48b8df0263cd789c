//! Random sentence generation over a [`Vocabulary`].
//!
//! The random source is always passed in by the caller; seeding a
//! `StdRng` makes every sentence reproducible.
use rand::Rng;

use crate::dictionary::Vocabulary;
use crate::error::{Error, Result};

/// A fixed-length word sequence borrowed from the vocabulary it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence<'a> {
    words: Vec<&'a str>,
}

impl<'a> Sentence<'a> {
    pub fn words(&self) -> &[&'a str] { &self.words }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn join(&self, sep: &str) -> String { self.words.join(sep) }
}

/// Draw `length` words uniformly and independently, with replacement.
pub fn generate<'a, R>(vocabulary: &'a Vocabulary, length: usize, rng: &mut R) -> Result<Sentence<'a>>
where
    R: Rng + ?Sized,
{
    if length == 0 {
        return Ok(Sentence { words: Vec::new() });
    }
    let words = vocabulary.words();
    if words.is_empty() {
        return Err(Error::EmptyVocabulary);
    }
    let words = (0..length).map(|_| words[rng.gen_range(0..words.len())].as_str()).collect();
    Ok(Sentence { words })
}

/// Binds a vocabulary and sentence length for repeated generation.
#[derive(Debug, Clone, Copy)]
pub struct SentenceGenerator<'a> {
    vocabulary: &'a Vocabulary,
    length: usize,
}

impl<'a> SentenceGenerator<'a> {
    pub fn new(vocabulary: &'a Vocabulary, length: usize) -> Self { Self { vocabulary, length } }

    pub fn length(&self) -> usize { self.length }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Sentence<'a>> {
        generate(self.vocabulary, self.length, rng)
    }
}
