//! Stub providers shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use prime_tape_core::{
    EmbeddingProvider, PoolingOptions, ProviderError, ProviderFactory, SamplerConfig, TapeSampler,
};

/// Returns `[value; dimension]` for any text.
pub struct ConstantProvider {
    pub value: f32,
    pub dimension: usize,
}

#[async_trait]
impl EmbeddingProvider for ConstantProvider {
    async fn embed(&self, _text: &str, _options: &PoolingOptions) -> Result<Vec<f32>, ProviderError> {
        Ok(vec![self.value; self.dimension])
    }

    fn model_name(&self) -> &str {
        "constant"
    }
}

/// Always fails to embed.
pub struct BrokenProvider;

#[async_trait]
impl EmbeddingProvider for BrokenProvider {
    async fn embed(&self, _text: &str, _options: &PoolingOptions) -> Result<Vec<f32>, ProviderError> {
        Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "inference backend dropped the connection",
        )))
    }

    fn model_name(&self) -> &str {
        "broken"
    }
}

/// Model id -> provider. Ids starting with "broken" load a `BrokenProvider`,
/// "short" a 4-dimensional constant provider, "missing" fail to load, and
/// everything else `[value; dimension]`. Counts loads and sleeps `delay`.
pub struct StubFactory {
    pub value: f32,
    pub dimension: usize,
    pub delay: Duration,
    pub loads: AtomicUsize,
}

impl StubFactory {
    pub fn constant(value: f32, dimension: usize) -> Self {
        Self {
            value,
            dimension,
            delay: Duration::ZERO,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::constant(1.0, 16)
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderFactory for StubFactory {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if model_id.starts_with("missing") {
            return Err(format!("no weights published for {model_id}").into());
        }
        if model_id.starts_with("broken") {
            return Ok(Arc::new(BrokenProvider));
        }
        let dimension = if model_id.starts_with("short") { 4 } else { self.dimension };
        Ok(Arc::new(ConstantProvider {
            value: self.value,
            dimension,
        }))
    }
}

pub fn sampler_with(factory: Arc<StubFactory>) -> TapeSampler {
    TapeSampler::new(factory, SamplerConfig::default()).expect("default config is valid")
}
