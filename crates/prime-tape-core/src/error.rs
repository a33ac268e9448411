//! Error type for every failure in the sampling pipeline.
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Model | ModelInit, ModelNotInitialized, ProviderEmbedding |
//! | Validation | InsufficientDimensions, InvalidReductionTarget, EmptyTape, EmptyResults |
//! | Configuration | ConfigError |
//! | Serialization | SerializationError |
//!
//! Nothing in this crate retries. Every variant carries enough context
//! (model identifier, operation, sizes) to render a message for the caller,
//! and a sampling call either succeeds completely or returns one of these.

use thiserror::Error;

/// Boxed error produced by an embedding provider or provider factory.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// Provider error shared by every caller waiting on one failed model load.
pub type SharedProviderError = std::sync::Arc<dyn std::error::Error + Send + Sync>;

/// Crate-wide error for tape sampling failures.
#[derive(Debug, Error)]
pub enum SamplerError {
    // === Model Errors ===
    /// Provider failed to load or initialize the model.
    #[error("Model initialization failed for '{model_id}': {source}")]
    ModelInit {
        model_id: String,
        #[source]
        source: SharedProviderError,
    },

    /// Tokenize/embed called before `initialize_model`.
    #[error("Model '{model_id}' not initialized (operation: {operation})")]
    ModelNotInitialized { model_id: String, operation: String },

    /// Embedding provider returned an error; kept unchanged as the source.
    #[error("Embedding provider failed for '{model_id}': {source}")]
    ProviderEmbedding {
        model_id: String,
        #[source]
        source: ProviderError,
    },

    // === Validation Errors ===
    /// Reduction target exceeds the available vector length.
    #[error("Insufficient dimensions: cannot reduce {available} components to {target}")]
    InsufficientDimensions { available: usize, target: usize },

    /// Reduction to zero dimensions requested.
    #[error("Invalid reduction target: {target}")]
    InvalidReductionTarget { target: usize },

    /// Tape contains no characters.
    #[error("Empty tape not allowed")]
    EmptyTape,

    /// Cross-model statistic requested over no results.
    #[error("Variance requires at least one sampling result")]
    EmptyResults,

    // === Configuration Errors ===
    /// Unreadable, unparsable or invalid configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    // === Serialization Errors ===
    /// Result could not be rendered as JSON.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl SamplerError {
    /// Returns true for errors tied to a specific model.
    pub fn is_model_error(&self) -> bool {
        matches!(
            self,
            Self::ModelInit { .. } | Self::ModelNotInitialized { .. } | Self::ProviderEmbedding { .. }
        )
    }

    /// Model identifier the error refers to, if any.
    pub fn model_id(&self) -> Option<&str> {
        match self {
            Self::ModelInit { model_id, .. }
            | Self::ModelNotInitialized { model_id, .. }
            | Self::ProviderEmbedding { model_id, .. } => Some(model_id),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SamplerError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}

/// Result alias for sampling operations.
pub type SamplerResult<T> = Result<T, SamplerError>;
