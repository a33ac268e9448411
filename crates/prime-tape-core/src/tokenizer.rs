//! Hash-based tokenizer.
//!
//! Every codepoint of the tape (separators included) becomes one token. The
//! token id is a 32-bit rolling hash over the codepoint's UTF-16 code units:
//!
//! ```text
//! hash = 0
//! for each UTF-16 unit c:  hash = (hash << 5) - hash + c   (wrapping i32)
//! id = |hash| mod VOCAB_SIZE
//! ```
//!
//! The scheme is model-independent; the model only has to be initialized.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::model_cache::ModelHandle;
use crate::tape::Tape;

/// Fixed vocabulary size.
pub const VOCAB_SIZE: u32 = 50_000;

/// Marker counted as an unknown token.
pub const UNKNOWN_TOKEN: &str = "[UNK]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationResult {
    pub model_id: String,
    pub token_ids: Vec<u32>,
    pub token_strings: Vec<String>,
    pub sequence_length: usize,
    pub vocab_size: u32,
    /// Tokens equal to [`UNKNOWN_TOKEN`]. Single-codepoint tokens can never
    /// match the marker, so this is always zero under the hash scheme.
    pub unknown_token_count: usize,
}

/// Rolling hash of one glyph over its UTF-16 code units.
pub fn glyph_hash(glyph: &str) -> i32 {
    glyph.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Token id for one glyph.
pub fn token_id(glyph: &str) -> u32 {
    glyph_hash(glyph).unsigned_abs() % VOCAB_SIZE
}

/// Tokenize `tape` for an initialized model.
#[instrument(skip(handle, tape), fields(model_id = handle.model_id()))]
pub fn tokenize(handle: &ModelHandle, tape: &Tape) -> TokenizationResult {
    let token_strings: Vec<String> = tape.glyphs().map(String::from).collect();
    let token_ids: Vec<u32> = token_strings.iter().map(|g| token_id(g)).collect();
    let unknown_token_count = token_strings.iter().filter(|t| t.as_str() == UNKNOWN_TOKEN).count();

    debug!(tokens = token_ids.len(), "tape tokenized");

    TokenizationResult {
        model_id: handle.model_id().to_string(),
        sequence_length: token_ids.len(),
        token_ids,
        token_strings,
        vocab_size: VOCAB_SIZE,
        unknown_token_count,
    }
}
