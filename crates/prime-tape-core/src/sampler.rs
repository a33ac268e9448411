//! Sampling orchestrator.
//!
//! `TapeSampler` is the boundary consumed by display layers and the CLI:
//!
//! ```text
//! sample_tape(model_id, tape)
//! ├── initialize_model      (memoized in ModelCache)
//! ├── tokenize              (hash token ids)
//! ├── embed                 (pooled vector + synthetic layers)
//! ├── map_to_primes         (10 ranked activations, whole tape)
//! ├── encode                (whole-tape Gödel number)
//! └── universal anchor      (prime-2 entry)
//! ```
//!
//! Any failing step aborts the call; no partial result is returned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::SamplerConfig;
use crate::embedder::{Embedder, EmbeddingResult};
use crate::error::SamplerResult;
use crate::godel::{self, GodelEncoding};
use crate::mapper::{self, PrimeActivations};
use crate::model_cache::ModelCache;
use crate::provider::{HashProviderFactory, ProviderFactory};
use crate::registry::ANCHOR_PRIME;
use crate::tape::Tape;
use crate::tokenizer::{self, TokenizationResult};

/// Prime-2 reference point of one sampling result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversalAnchor {
    pub prime2_activation: f64,
    /// `|normalized_activation|` of the prime-2 entry.
    pub consistency_score: f64,
    /// Always 0 for a single result; drift needs a collection.
    pub semantic_drift: f64,
}

impl UniversalAnchor {
    pub fn from_activations(activations: &PrimeActivations) -> Self {
        let (prime2_activation, consistency_score) = activations
            .by_prime(ANCHOR_PRIME)
            .map(|a| (a.activation, a.normalized_activation.abs()))
            .unwrap_or((0.0, 0.0));
        Self {
            prime2_activation,
            consistency_score,
            semantic_drift: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingResult {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub tape: Tape,
    pub tokenization: TokenizationResult,
    pub embedding: EmbeddingResult,
    pub prime_activations: PrimeActivations,
    /// Encoding of the whole tape, not per segment.
    pub godel: GodelEncoding,
    pub universal_anchor: UniversalAnchor,
}

impl SamplingResult {
    pub fn model_id(&self) -> &str {
        &self.embedding.model_id
    }
}

/// Composes tokenizer, embedder, mapper and encoder over a shared model cache.
pub struct TapeSampler {
    cache: Arc<ModelCache>,
    embedder: Embedder,
    config: SamplerConfig,
    default_tape: Tape,
}

impl TapeSampler {
    /// # Errors
    /// `SamplerError::ConfigError` if `config` does not validate.
    pub fn new(factory: Arc<dyn ProviderFactory>, config: SamplerConfig) -> SamplerResult<Self> {
        config.validate()?;
        Ok(Self {
            cache: Arc::new(ModelCache::new(factory)),
            embedder: Embedder::from_config(&config.embedder),
            default_tape: config.tape.tape()?,
            config,
        })
    }

    /// Sampler backed by the built-in hash provider.
    pub fn from_config(config: SamplerConfig) -> SamplerResult<Self> {
        let factory = Arc::new(HashProviderFactory::new(config.provider.dimension));
        Self::new(factory, config)
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }

    pub fn default_tape(&self) -> &Tape {
        &self.default_tape
    }

    pub fn default_model(&self) -> &str {
        &self.config.models.default_model
    }

    fn tape_or_default<'a>(&'a self, tape: Option<&'a Tape>) -> &'a Tape {
        tape.unwrap_or(&self.default_tape)
    }

    /// # Errors
    /// `SamplerError::ModelInit` if the provider fails to load.
    pub async fn initialize_model(&self, model_id: &str) -> SamplerResult<()> {
        self.cache.initialize(model_id).await.map(|_| ())
    }

    /// # Errors
    /// `SamplerError::ModelNotInitialized` before `initialize_model`.
    pub fn tokenize_tape(
        &self,
        model_id: &str,
        tape: Option<&Tape>,
    ) -> SamplerResult<TokenizationResult> {
        let handle = self.cache.handle(model_id, "tokenize")?;
        Ok(tokenizer::tokenize(&handle, self.tape_or_default(tape)))
    }

    /// # Errors
    /// - `SamplerError::ModelNotInitialized` before `initialize_model`
    /// - `SamplerError::ProviderEmbedding` if the provider fails
    pub async fn embed_tape(
        &self,
        model_id: &str,
        tape: Option<&Tape>,
    ) -> SamplerResult<EmbeddingResult> {
        let handle = self.cache.handle(model_id, "embed")?;
        self.embedder.embed(&handle, self.tape_or_default(tape)).await
    }

    pub fn map_embeddings_to_primes(
        &self,
        embedding: &EmbeddingResult,
    ) -> SamplerResult<PrimeActivations> {
        mapper::map_to_primes(embedding)
    }

    pub fn encode_as_godel(
        &self,
        segment_text: &str,
        activations: &PrimeActivations,
    ) -> GodelEncoding {
        godel::encode(segment_text, activations)
    }

    /// Per-segment encodings using the configured separator.
    pub fn encode_segments(
        &self,
        tape: Option<&Tape>,
        activations: &PrimeActivations,
    ) -> Vec<GodelEncoding> {
        godel::encode_segments(
            self.tape_or_default(tape),
            self.config.tape.separator_char(),
            activations,
        )
    }

    /// Run the full pipeline for one model.
    #[instrument(skip(self, tape))]
    pub async fn sample_tape(
        &self,
        model_id: &str,
        tape: Option<&Tape>,
    ) -> SamplerResult<SamplingResult> {
        let tape = self.tape_or_default(tape);
        self.initialize_model(model_id).await?;

        let tokenization = self.tokenize_tape(model_id, Some(tape))?;
        let embedding = self.embed_tape(model_id, Some(tape)).await?;
        let prime_activations = self.map_embeddings_to_primes(&embedding)?;
        let godel = self.encode_as_godel(tape.as_str(), &prime_activations);
        let universal_anchor = UniversalAnchor::from_activations(&prime_activations);

        info!(
            model_id,
            tokens = tokenization.sequence_length,
            prime2_activation = universal_anchor.prime2_activation,
            godel_bits = godel.godel_number.bits(),
            "tape sampled"
        );

        Ok(SamplingResult {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            tape: tape.clone(),
            tokenization,
            embedding,
            prime_activations,
            godel,
            universal_anchor,
        })
    }
}

impl std::fmt::Debug for TapeSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapeSampler")
            .field("cache", &self.cache)
            .field("embedder", &self.embedder)
            .field("default_tape", &self.default_tape)
            .finish()
    }
}
