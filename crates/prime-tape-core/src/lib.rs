//! Prime tape sampling.
//!
//! Samples a fixed glyph tape through a pluggable embedding provider,
//! reduces the pooled vector to ten intrinsic prime activations, and
//! re-encodes the tape as an arbitrary-precision Gödel number using those
//! activations as per-glyph exponents.
//!
//! # Architecture
//!
//! - **PrimeRegistry**: the static ten-entry `(glyph, prime)` table
//! - **Tokenizer**: hash-based token ids per codepoint
//! - **ModelCache**: memoized per-model initialization shared by tokenizer and embedder
//! - **Embedder**: pooled vector from the provider plus synthetic layers
//! - **Reducer / Mapper**: chunk-average to ten dimensions, tanh, rank
//! - **Gödel encoder**: product of prime powers over a segment
//! - **TapeSampler**: composes everything into a `SamplingResult`
//!
//! # Example
//!
//! ```rust
//! use prime_tape_core::{PrimeRegistry, Tape};
//!
//! assert_eq!(PrimeRegistry::primes().count(), 10);
//! assert_eq!(Tape::default().segments().count(), 3);
//! ```

pub mod config;
pub mod embedder;
pub mod error;
pub mod godel;
pub mod mapper;
pub mod model_cache;
pub mod provider;
pub mod reducer;
pub mod registry;
pub mod sampler;
pub mod tape;
pub mod tokenizer;
pub mod variance;

pub use config::{
    EmbedderConfig, LoggingConfig, ModelsConfig, ProviderConfig, SamplerConfig, TapeConfig,
};
pub use embedder::{Embedder, EmbeddingLayer, EmbeddingResult};
pub use error::{ProviderError, SamplerError, SamplerResult, SharedProviderError};
pub use godel::{encode, encode_segments, glyph_prime_product, GodelEncoding, Hierarchy};
pub use mapper::{map_to_primes, PrimeActivation, PrimeActivations};
pub use model_cache::{ModelCache, ModelHandle};
pub use provider::{
    EmbeddingProvider, HashEmbeddingProvider, HashProviderFactory, Pooling, PoolingOptions,
    ProviderFactory,
};
pub use reducer::reduce;
pub use registry::{PrimeEntry, PrimeRegistry, ANCHOR_PRIME, PRIME_COUNT};
pub use sampler::{SamplingResult, TapeSampler, UniversalAnchor};
pub use tape::{Tape, DEFAULT_TAPE, SEGMENT_SEPARATOR};
pub use tokenizer::{tokenize, TokenizationResult, VOCAB_SIZE};
pub use variance::{prime2_variance, CrossModelSummary, ModelAnchor};
