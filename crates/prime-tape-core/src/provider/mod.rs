//! Embedding provider boundary.
//!
//! The provider is the one external collaborator of this crate: given text
//! and pooling options it returns a fixed-length vector. Its internals are
//! opaque here.
//!
//! ```text
//! ProviderFactory (trait)
//! └── load(model_id) -> Arc<dyn EmbeddingProvider>   // slow, memoized by ModelCache
//!
//! EmbeddingProvider (trait)
//! ├── embed(&str, &PoolingOptions) -> Vec<f32>       // pooled vector
//! └── model_name() -> &str
//! ```

mod hash;

pub use hash::{HashEmbeddingProvider, HashProviderFactory};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// How token vectors are pooled into one vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Pooling {
    #[default]
    Mean,
}

/// Options passed to every `embed` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolingOptions {
    pub pooling: Pooling,
    /// L2-normalize the pooled vector.
    pub normalize: bool,
}

impl Default for PoolingOptions {
    fn default() -> Self {
        Self {
            pooling: Pooling::Mean,
            normalize: true,
        }
    }
}

/// Produces pooled embeddings for one loaded model.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Pooled vector for `text`.
    async fn embed(&self, text: &str, options: &PoolingOptions) -> Result<Vec<f32>, ProviderError>;

    fn model_name(&self) -> &str;
}

/// Loads providers by model identifier.
///
/// Loading may block on network or disk; `ModelCache` guarantees at most
/// one in-flight `load` per model identifier.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn EmbeddingProvider>, ProviderError>;
}
