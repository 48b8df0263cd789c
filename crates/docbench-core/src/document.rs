//! Turns a sequence position and a sentence into a [`Document`].
use crate::sentence::Sentence;
use crate::types::Document;

pub fn build(sequence_index: u64, sentence: &Sentence<'_>) -> Document {
    Document { id: sequence_index.to_string(), text: sentence.join(" ") }
}
