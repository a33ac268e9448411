//! Prime mapper: pooled vector -> ten ranked prime activations.
//!
//! The ten activations are held once, in registry order. Rank order is a
//! second view over the same entries (an index permutation), so consumers
//! pick a view instead of re-sorting.

use serde::{Serialize, Serializer};
use tracing::{debug, instrument};

use crate::embedder::EmbeddingResult;
use crate::error::SamplerResult;
use crate::reducer::reduce;
use crate::registry::{PrimeRegistry, PRIME_COUNT};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimeActivation {
    pub prime: u32,
    pub glyph: char,
    pub activation: f64,
    /// `tanh(activation)`, in (-1, 1).
    pub normalized_activation: f64,
    /// 1-based position by descending `|normalized_activation|`.
    pub rank: usize,
}

/// The full ten-entry activation set with registry and rank views.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimeActivations {
    entries: Vec<PrimeActivation>,
    rank_order: Vec<usize>,
}

impl PrimeActivations {
    /// Build from one raw activation per registry entry.
    ///
    /// Missing trailing values count as 0. Ranking is a stable sort by
    /// descending `|tanh(activation)|`, so ties keep registry order.
    pub fn from_activations(raw: &[f64]) -> Self {
        let mut entries: Vec<PrimeActivation> = PrimeRegistry::entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let activation = raw.get(i).copied().unwrap_or(0.0);
                PrimeActivation {
                    prime: entry.prime,
                    glyph: entry.glyph,
                    activation,
                    normalized_activation: activation.tanh(),
                    rank: 0,
                }
            })
            .collect();

        let mut rank_order: Vec<usize> = (0..entries.len()).collect();
        rank_order.sort_by(|&a, &b| {
            let a = entries[a].normalized_activation.abs();
            let b = entries[b].normalized_activation.abs();
            b.total_cmp(&a)
        });
        for (position, &idx) in rank_order.iter().enumerate() {
            entries[idx].rank = position + 1;
        }

        Self { entries, rank_order }
    }

    /// Entries in canonical registry order.
    pub fn registry_order(&self) -> impl Iterator<Item = &PrimeActivation> + '_ {
        self.entries.iter()
    }

    /// Entries from rank 1 to rank 10.
    pub fn ranked(&self) -> impl Iterator<Item = &PrimeActivation> + '_ {
        self.rank_order.iter().map(move |&i| &self.entries[i])
    }

    pub fn by_prime(&self, prime: u32) -> Option<&PrimeActivation> {
        self.entries.iter().find(|a| a.prime == prime)
    }

    pub fn by_glyph(&self, glyph: char) -> Option<&PrimeActivation> {
        PrimeRegistry::by_glyph(glyph).map(|(idx, _)| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PrimeActivations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ranked())
    }
}

/// Reduce the pooled vector to the prime count and rank the activations.
///
/// # Errors
/// `SamplerError::InsufficientDimensions` if the pooled vector has fewer
/// than ten components.
#[instrument(skip(embedding), fields(model_id = %embedding.model_id))]
pub fn map_to_primes(embedding: &EmbeddingResult) -> SamplerResult<PrimeActivations> {
    let reduced = reduce(&embedding.pooled_vector, PRIME_COUNT)?;
    let activations = PrimeActivations::from_activations(&reduced);

    if let Some(top) = activations.ranked().next() {
        debug!(prime = top.prime, normalized = top.normalized_activation, "top prime activation");
    }
    Ok(activations)
}
