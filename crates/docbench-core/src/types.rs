//! Domain types shared between the driver and engine adapters.

use serde::{Deserialize, Serialize};

/// Name of the exact-match key field every document carries.
pub const ID_FIELD: &str = "id";

/// Name of the tokenized body field.
pub const TEXT_FIELD: &str = "text";

/// A generated document as handed to the engine.
///
/// - `id`: decimal sequence position, stored and matched exactly
/// - `text`: space-joined sentence, indexed but not stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}
