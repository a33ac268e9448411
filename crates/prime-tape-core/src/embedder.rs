//! Tape embedder.
//!
//! Step 1 asks the provider for the pooled vector (mean pooling, L2
//! normalization) and times the call. Step 2 derives synthetic per-layer
//! vectors for visualization:
//!
//! ```text
//! layer_scale = (layer_index + 1) / layer_count
//! layer[i]    = pooled[i] * layer_scale + uniform(-noise, noise)
//! ```
//!
//! The layers are not an introspection of a real network. With no
//! `noise_seed` configured the jitter comes from OS entropy and the layers
//! differ between calls for identical input; `pooled_vector` and everything
//! derived from it stays deterministic for a deterministic provider.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::EmbedderConfig;
use crate::error::{SamplerError, SamplerResult};
use crate::model_cache::ModelHandle;
use crate::provider::PoolingOptions;
use crate::tape::Tape;

/// Layer count for BERT- or GPT-family names.
pub const DEEP_LAYER_COUNT: usize = 12;

/// Layer count for every other model.
pub const SHALLOW_LAYER_COUNT: usize = 6;

/// Synthetic layer count from a model identifier (case-sensitive match).
pub fn layer_count(model_id: &str) -> usize {
    if model_id.contains("bert") || model_id.contains("gpt") {
        DEEP_LAYER_COUNT
    } else {
        SHALLOW_LAYER_COUNT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingLayer {
    pub layer_index: usize,
    pub vector: Vec<f32>,
    pub dimension: usize,
    /// Euclidean norm of `vector`.
    pub norm: f32,
}

impl EmbeddingLayer {
    fn new(layer_index: usize, vector: Vec<f32>) -> Self {
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        Self {
            layer_index,
            dimension: vector.len(),
            vector,
            norm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingResult {
    pub model_id: String,
    pub layers: Vec<EmbeddingLayer>,
    pub pooled_vector: Vec<f32>,
    pub hidden_size: usize,
    pub processing_time_ms: f64,
}

/// Produces pooled and synthetic layer vectors for a tape.
#[derive(Debug, Clone)]
pub struct Embedder {
    options: PoolingOptions,
    layer_noise: f32,
    noise_seed: Option<u64>,
}

impl Default for Embedder {
    fn default() -> Self {
        Self::from_config(&EmbedderConfig::default())
    }
}

impl Embedder {
    pub fn from_config(config: &EmbedderConfig) -> Self {
        Self {
            options: PoolingOptions {
                pooling: config.pooling,
                normalize: config.normalize,
            },
            layer_noise: config.layer_noise,
            noise_seed: config.layer_noise_seed,
        }
    }

    /// Embed `tape` with an initialized model.
    ///
    /// # Errors
    /// `SamplerError::ProviderEmbedding` wrapping the provider's error.
    #[instrument(skip(self, handle, tape), fields(model_id = handle.model_id()))]
    pub async fn embed(&self, handle: &ModelHandle, tape: &Tape) -> SamplerResult<EmbeddingResult> {
        let start = Instant::now();
        let pooled_vector = handle
            .provider()
            .embed(tape.as_str(), &self.options)
            .await
            .map_err(|source| SamplerError::ProviderEmbedding {
                model_id: handle.model_id().to_string(),
                source,
            })?;
        let processing_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let layers = self.synthetic_layers(&pooled_vector, handle.layer_count());

        debug!(
            hidden_size = pooled_vector.len(),
            layers = layers.len(),
            processing_time_ms,
            "tape embedded"
        );

        Ok(EmbeddingResult {
            model_id: handle.model_id().to_string(),
            layers,
            hidden_size: pooled_vector.len(),
            pooled_vector,
            processing_time_ms,
        })
    }

    fn synthetic_layers(&self, pooled: &[f32], layer_count: usize) -> Vec<EmbeddingLayer> {
        let mut rng = match self.noise_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let noise = self.layer_noise;

        (0..layer_count)
            .map(|layer_index| {
                let layer_scale = (layer_index + 1) as f32 / layer_count as f32;
                let vector = pooled
                    .iter()
                    .map(|v| {
                        let jitter = if noise > 0.0 {
                            rng.gen_range(-noise..=noise)
                        } else {
                            0.0
                        };
                        v * layer_scale + jitter
                    })
                    .collect();
                EmbeddingLayer::new(layer_index, vector)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::HashEmbeddingProvider;
    use std::sync::Arc;

    fn handle(model_id: &str) -> ModelHandle {
        ModelHandle::new(model_id, Arc::new(HashEmbeddingProvider::new(model_id, 24)))
    }

    fn seeded(noise: f32, seed: u64) -> Embedder {
        Embedder::from_config(&EmbedderConfig {
            layer_noise: noise,
            layer_noise_seed: Some(seed),
            ..EmbedderConfig::default()
        })
    }

    #[test]
    fn test_layer_count_by_family() {
        assert_eq!(layer_count("Xenova/bert-base-uncased"), 12);
        assert_eq!(layer_count("Xenova/gpt2"), 12);
        assert_eq!(layer_count("Xenova/all-MiniLM-L6-v2"), 6);
        assert_eq!(layer_count("Xenova/BERT-large"), 6);
    }

    #[tokio::test]
    async fn test_embed_shapes() {
        let result = Embedder::default()
            .embed(&handle("Xenova/bert-base-uncased"), &Tape::default())
            .await
            .expect("embed");
        assert_eq!(result.hidden_size, 24);
        assert_eq!(result.layers.len(), 12);
        for (i, layer) in result.layers.iter().enumerate() {
            assert_eq!(layer.layer_index, i);
            assert_eq!(layer.dimension, 24);
        }
        assert!(result.processing_time_ms >= 0.0);
    }

    #[tokio::test]
    async fn test_noiseless_layers_are_scaled_pooled() {
        let result = seeded(0.0, 1)
            .embed(&handle("m"), &Tape::default())
            .await
            .expect("embed");
        let last = &result.layers[5];
        assert_eq!(last.vector, result.pooled_vector);
        let first = &result.layers[0];
        for (l, p) in first.vector.iter().zip(&result.pooled_vector) {
            assert!((l - p / 6.0).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_jitter_is_bounded() {
        let result = seeded(0.05, 7)
            .embed(&handle("m"), &Tape::default())
            .await
            .expect("embed");
        for layer in &result.layers {
            let scale = (layer.layer_index + 1) as f32 / 6.0;
            for (l, p) in layer.vector.iter().zip(&result.pooled_vector) {
                assert!((l - p * scale).abs() <= 0.05 + 1e-6);
            }
        }
    }

    #[tokio::test]
    async fn test_unseeded_layers_vary_but_pooled_does_not() {
        let embedder = Embedder::default();
        let a = embedder.embed(&handle("m"), &Tape::default()).await.expect("embed");
        let b = embedder.embed(&handle("m"), &Tape::default()).await.expect("embed");
        assert_eq!(a.pooled_vector, b.pooled_vector);
        assert_eq!(a.layers.len(), b.layers.len());
        assert_ne!(a.layers, b.layers);
    }

    #[tokio::test]
    async fn test_seeded_layers_repeat_and_pooled_is_stable() {
        let embedder = seeded(0.05, 42);
        let a = embedder.embed(&handle("m"), &Tape::default()).await.expect("embed");
        let b = embedder.embed(&handle("m"), &Tape::default()).await.expect("embed");
        assert_eq!(a.pooled_vector, b.pooled_vector);
        assert_eq!(a.layers, b.layers);
    }
}
