//! Deterministic hash-based embedding provider.
//!
//! Generates embeddings without model weights:
//!
//! 1. Hash the model name once into a base seed
//! 2. For every codepoint, seed an LCG (Knuth MMIX constants) with
//!    `base_seed ^ codepoint` and draw `dimension` values in [-1, 1]
//! 3. Mean-pool the per-codepoint vectors
//! 4. L2-normalize when the options ask for it
//!
//! Same (model, text) always gives the same vector; different models give
//! different vectors for the same text.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use super::{EmbeddingProvider, Pooling, PoolingOptions, ProviderFactory};
use crate::error::ProviderError;

const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// Weightless provider used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    model_name: String,
    dimension: usize,
    base_seed: u64,
}

impl HashEmbeddingProvider {
    pub fn new(model_name: impl Into<String>, dimension: usize) -> Self {
        let model_name = model_name.into();
        let mut hasher = DefaultHasher::new();
        model_name.hash(&mut hasher);
        Self {
            base_seed: hasher.finish(),
            model_name,
            dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn codepoint_vector(&self, c: char) -> Vec<f32> {
        let mut state = self.base_seed ^ u64::from(c as u32);
        (0..self.dimension)
            .map(|_| {
                state = state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(1);
                ((state as f64 / u64::MAX as f64) * 2.0 - 1.0) as f32
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str, options: &PoolingOptions) -> Result<Vec<f32>, ProviderError> {
        if text.is_empty() {
            return Err("cannot embed empty text".into());
        }

        let mut pooled = vec![0.0f32; self.dimension];
        let mut count = 0usize;
        for c in text.chars() {
            for (acc, v) in pooled.iter_mut().zip(self.codepoint_vector(c)) {
                *acc += v;
            }
            count += 1;
        }

        match options.pooling {
            Pooling::Mean => {
                let n = count as f32;
                pooled.iter_mut().for_each(|v| *v /= n);
            }
        }

        if options.normalize {
            let magnitude = pooled.iter().map(|v| v * v).sum::<f32>().sqrt();
            if magnitude > 0.0 {
                pooled.iter_mut().for_each(|v| *v /= magnitude);
            }
        }

        trace!(model = %self.model_name, tokens = count, "hash embedding pooled");
        Ok(pooled)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Factory handing out `HashEmbeddingProvider`s of a fixed dimension.
#[derive(Debug, Clone)]
pub struct HashProviderFactory {
    dimension: usize,
}

impl HashProviderFactory {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl ProviderFactory for HashProviderFactory {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        if model_id.trim().is_empty() {
            return Err("model identifier must not be empty".into());
        }
        debug!(model_id, dimension = self.dimension, "loading hash embedding provider");
        Ok(Arc::new(HashEmbeddingProvider::new(model_id, self.dimension)))
    }
}
