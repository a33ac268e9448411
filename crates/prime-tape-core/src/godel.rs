//! Gödel encodings of tape segments.
//!
//! Two variants that are not interchangeable:
//!
//! - [`encode`]: activation-weighted. Each registry glyph contributes
//!   `p^max(1, floor(|tanh(a)| * 5))` using the whole-tape activation set.
//! - [`glyph_prime_product`]: raw. Each registry glyph contributes `p`,
//!   separators stripped, no activation dependence.

use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use tracing::{debug, instrument, warn};

use crate::mapper::PrimeActivations;
use crate::registry::PrimeRegistry;
use crate::tape::{Tape, SEGMENT_SEPARATOR};

/// Multiplier applied to `|normalized_activation|` before flooring.
pub const EXPONENT_SCALE: f64 = 5.0;

/// Codepoints per hierarchy cycle.
pub const CYCLE_LENGTH: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    /// Codepoint length of the segment, separators included.
    pub size: usize,
    pub program: String,
    pub cycles: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GodelEncoding {
    pub segment_text: String,
    #[serde(serialize_with = "serialize_decimal")]
    pub godel_number: BigUint,
    pub prime_activations: PrimeActivations,
    pub hierarchy: Hierarchy,
}

fn serialize_decimal<S: Serializer>(n: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&n.to_str_radix(10))
}

/// Exponent for one normalized activation, in `1..=5`.
pub fn exponent_for(normalized_activation: f64) -> u32 {
    let scaled = (normalized_activation.abs() * EXPONENT_SCALE).floor();
    (scaled as u32).max(1)
}

/// Activation-weighted Gödel number of `segment_text`.
///
/// Glyphs outside the registry (including the separator) contribute a
/// factor of 1, so a segment with no registry glyph encodes to 1.
#[instrument(skip(activations), fields(size = segment_text.chars().count()))]
pub fn encode(segment_text: &str, activations: &PrimeActivations) -> GodelEncoding {
    let mut godel_number = BigUint::from(1u32);
    let mut matched = 0usize;

    for glyph in segment_text.chars() {
        let Some(activation) = activations.by_glyph(glyph) else {
            continue;
        };
        let exponent = exponent_for(activation.normalized_activation);
        godel_number *= BigUint::from(activation.prime).pow(exponent);
        matched += 1;
    }

    if matched == 0 {
        warn!("segment contains no registry glyph; Gödel number is 1");
    } else {
        debug!(matched, bits = godel_number.bits(), "segment encoded");
    }

    let size = segment_text.chars().count();
    GodelEncoding {
        segment_text: segment_text.to_string(),
        godel_number,
        prime_activations: activations.clone(),
        hierarchy: Hierarchy {
            size,
            program: segment_text.to_string(),
            cycles: size / CYCLE_LENGTH,
        },
    }
}

/// One encoding per segment, all sharing the whole-tape `activations`.
pub fn encode_segments(
    tape: &Tape,
    separator: char,
    activations: &PrimeActivations,
) -> Vec<GodelEncoding> {
    tape.segments_by(separator)
        .map(|segment| encode(segment, activations))
        .collect()
}

/// Raw product of registry primes over the tape, separators stripped.
pub fn glyph_prime_product(tape: &Tape) -> BigUint {
    tape.glyphs()
        .filter(|g| *g != SEGMENT_SEPARATOR)
        .filter_map(|g| PrimeRegistry::by_glyph(g).map(|(_, entry)| entry.prime))
        .fold(BigUint::from(1u32), |acc, p| acc * BigUint::from(p))
}
