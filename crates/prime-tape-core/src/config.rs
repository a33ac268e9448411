//! Root configuration for tape sampling.
//!
//! # Loading Configuration
//!
//! ```rust,ignore
//! use prime_tape_core::SamplerConfig;
//!
//! let config = SamplerConfig::from_file("prime-tape.toml")?
//!     .with_env_overrides();
//! config.validate()?;
//! ```
//!
//! # TOML Structure
//!
//! ```toml
//! [tape]
//! default_tape = "🪐🎩🔢🎲🎶🎷📜|🪐🎷🧬🎲📜|🪐🎶🔢🎯🎲📜🚀"
//! separator = "|"
//!
//! [models]
//! default_model = "Xenova/all-MiniLM-L6-v2"
//!
//! [embedder]
//! layer_noise = 0.05
//! layer_noise_seed = 42
//! pooling = "mean"
//! normalize = true
//!
//! [provider]
//! dimension = 384
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! Invalid configuration returns an error; it is never silently corrected.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SamplerError, SamplerResult};
use crate::provider::Pooling;
use crate::registry::{PrimeRegistry, PRIME_COUNT};
use crate::tape::{Tape, DEFAULT_TAPE, SEGMENT_SEPARATOR};

// ============================================================================
// TAPE CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapeConfig {
    #[serde(default = "default_tape")]
    pub default_tape: String,

    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_tape() -> String {
    DEFAULT_TAPE.to_string()
}

fn default_separator() -> String {
    SEGMENT_SEPARATOR.to_string()
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self {
            default_tape: default_tape(),
            separator: default_separator(),
        }
    }
}

impl TapeConfig {
    pub fn validate(&self) -> SamplerResult<()> {
        if self.default_tape.is_empty() {
            return Err(SamplerError::ConfigError {
                message: "default_tape cannot be empty".to_string(),
            });
        }
        let mut chars = self.separator.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !PrimeRegistry::contains(c) => Ok(()),
            _ => Err(SamplerError::ConfigError {
                message: format!(
                    "separator must be a single non-registry character, got '{}'",
                    self.separator
                ),
            }),
        }
    }

    pub fn tape(&self) -> SamplerResult<Tape> {
        Tape::new(self.default_tape.clone())
    }

    /// Separator as a character; falls back to `|` for an empty string.
    pub fn separator_char(&self) -> char {
        self.separator.chars().next().unwrap_or(SEGMENT_SEPARATOR)
    }
}

// ============================================================================
// MODELS CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_model")]
    pub default_model: String,
}

fn default_model() -> String {
    "Xenova/all-MiniLM-L6-v2".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
        }
    }
}

impl ModelsConfig {
    pub fn validate(&self) -> SamplerResult<()> {
        if self.default_model.trim().is_empty() {
            return Err(SamplerError::ConfigError {
                message: "default_model cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// EMBEDDER CONFIG
// ============================================================================

/// Controls pooling and the synthetic per-layer jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Half-width of the uniform jitter added to every layer component.
    #[serde(default = "default_layer_noise")]
    pub layer_noise: f32,

    /// Fixed RNG seed for the jitter. `None` draws from OS entropy, making
    /// layer vectors differ between calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_noise_seed: Option<u64>,

    #[serde(default)]
    pub pooling: Pooling,

    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

fn default_layer_noise() -> f32 {
    0.05
}

fn default_normalize() -> bool {
    true
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            layer_noise: default_layer_noise(),
            layer_noise_seed: None,
            pooling: Pooling::Mean,
            normalize: default_normalize(),
        }
    }
}

impl EmbedderConfig {
    pub fn validate(&self) -> SamplerResult<()> {
        if !self.layer_noise.is_finite() || self.layer_noise < 0.0 {
            return Err(SamplerError::ConfigError {
                message: format!(
                    "layer_noise must be finite and >= 0, got {}",
                    self.layer_noise
                ),
            });
        }
        Ok(())
    }
}

// ============================================================================
// PROVIDER CONFIG
// ============================================================================

/// Settings for the built-in hash embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_dimension() -> usize {
    384
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> SamplerResult<()> {
        if self.dimension < PRIME_COUNT {
            return Err(SamplerError::ConfigError {
                message: format!(
                    "dimension must be at least {} (one component per prime), got {}",
                    PRIME_COUNT, self.dimension
                ),
            });
        }
        Ok(())
    }
}

// ============================================================================
// LOGGING CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when neither `-v` nor `RUST_LOG` is set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================================================
// ROOT CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    #[serde(default)]
    pub tape: TapeConfig,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub embedder: EmbedderConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SamplerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// `SamplerError::ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> SamplerResult<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| SamplerError::ConfigError {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        toml::from_str(&contents).map_err(|e| SamplerError::ConfigError {
            message: format!("Failed to parse TOML in '{}': {}", path.display(), e),
        })
    }

    /// Validate every section, returning the first error prefixed by its section.
    pub fn validate(&self) -> SamplerResult<()> {
        self.tape.validate().map_err(|e| section_error("tape", e))?;
        self.models.validate().map_err(|e| section_error("models", e))?;
        self.embedder.validate().map_err(|e| section_error("embedder", e))?;
        self.provider.validate().map_err(|e| section_error("provider", e))?;
        Ok(())
    }

    /// Apply environment overrides. Prefix: `PRIME_TAPE_`.
    ///
    /// | Variable | Config Path |
    /// |----------|-------------|
    /// | `PRIME_TAPE_DEFAULT_MODEL` | `models.default_model` |
    /// | `PRIME_TAPE_LAYER_NOISE` | `embedder.layer_noise` |
    /// | `PRIME_TAPE_LAYER_NOISE_SEED` | `embedder.layer_noise_seed` |
    /// | `PRIME_TAPE_PROVIDER_DIMENSION` | `provider.dimension` |
    /// | `PRIME_TAPE_LOG_LEVEL` | `logging.level` |
    ///
    /// Unparsable values are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var("PRIME_TAPE_DEFAULT_MODEL") {
            self.models.default_model = val;
        }
        if let Ok(val) = env::var("PRIME_TAPE_LAYER_NOISE") {
            if let Ok(n) = val.parse::<f32>() {
                self.embedder.layer_noise = n;
            }
        }
        if let Ok(val) = env::var("PRIME_TAPE_LAYER_NOISE_SEED") {
            if let Ok(n) = val.parse::<u64>() {
                self.embedder.layer_noise_seed = Some(n);
            }
        }
        if let Ok(val) = env::var("PRIME_TAPE_PROVIDER_DIMENSION") {
            if let Ok(n) = val.parse::<usize>() {
                self.provider.dimension = n;
            }
        }
        if let Ok(val) = env::var("PRIME_TAPE_LOG_LEVEL") {
            self.logging.level = val;
        }
        self
    }
}

fn section_error(section: &str, err: SamplerError) -> SamplerError {
    let message = match err {
        SamplerError::ConfigError { message } => message,
        other => other.to_string(),
    };
    SamplerError::ConfigError {
        message: format!("[{}] {}", section, message),
    }
}
