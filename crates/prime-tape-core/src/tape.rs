//! The glyph tape and its `|`-delimited segments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SamplerError, SamplerResult};
use crate::registry::PrimeRegistry;

/// Canonical tape sampled when the caller supplies none.
pub const DEFAULT_TAPE: &str = "🪐🎩🔢🎲🎶🎷📜|🪐🎷🧬🎲📜|🪐🎶🔢🎯🎲📜🚀";

/// Segment separator.
pub const SEGMENT_SEPARATOR: char = '|';

/// Non-empty glyph string.
///
/// Glyphs outside the registry are allowed; prime-dependent logic skips them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tape(String);

impl Tape {
    /// # Errors
    /// `SamplerError::EmptyTape` if `text` is empty.
    pub fn new(text: impl Into<String>) -> SamplerResult<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(SamplerError::EmptyTape);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Codepoints in order, separators included.
    pub fn glyphs(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }

    /// Codepoint length, separators included.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments_by(SEGMENT_SEPARATOR)
    }

    pub fn segments_by(&self, separator: char) -> impl Iterator<Item = &str> + '_ {
        self.0.split(separator)
    }

    /// Number of codepoints that map to a registry prime.
    pub fn registry_glyph_count(&self) -> usize {
        self.glyphs().filter(|g| PrimeRegistry::contains(*g)).count()
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self(DEFAULT_TAPE.to_string())
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Tape {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
