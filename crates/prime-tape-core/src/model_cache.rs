//! Per-model initialization cache.
//!
//! Maps model identifiers to lazily-initialized, memoized [`ModelHandle`]s.
//! The tokenizer and the embedder share one handle per identifier.
//!
//! # Thread Safety
//!
//! - A `parking_lot::Mutex` guards only the identifier -> cell map and is
//!   never held across an `.await`
//! - Each identifier owns a `tokio::sync::OnceCell` holding the outcome of
//!   one load attempt; concurrent `initialize` calls for the same
//!   identifier await that single load, whether it succeeds or fails
//! - Distinct identifiers load independently with no ordering between them
//! - A failed attempt is removed from the map once settled, so its error
//!   reaches every waiter of that attempt and only a later call loads again

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument};

use crate::embedder::layer_count;
use crate::error::{SamplerError, SamplerResult, SharedProviderError};
use crate::provider::{EmbeddingProvider, ProviderFactory};

/// Ready-to-use model shared by tokenizer and embedder.
#[derive(Clone)]
pub struct ModelHandle {
    model_id: String,
    provider: Arc<dyn EmbeddingProvider>,
    layer_count: usize,
    loaded_at: DateTime<Utc>,
}

impl ModelHandle {
    pub fn new(model_id: impl Into<String>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        let model_id = model_id.into();
        Self {
            layer_count: layer_count(&model_id),
            model_id,
            provider,
            loaded_at: Utc::now(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Number of synthetic layers derived from the model name.
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model_id", &self.model_id)
            .field("provider", &self.provider.model_name())
            .field("layer_count", &self.layer_count)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Outcome of one load attempt, shared by every caller of that attempt.
type LoadOutcome = Result<ModelHandle, SharedProviderError>;

type Slot = Arc<OnceCell<LoadOutcome>>;

fn ready(slot: &Slot) -> Option<&ModelHandle> {
    slot.get().and_then(|outcome| outcome.as_ref().ok())
}

/// Memoizing owner of every initialized model.
pub struct ModelCache {
    factory: Arc<dyn ProviderFactory>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl ModelCache {
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            factory,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, model_id: &str) -> Slot {
        let mut slots = self.slots.lock();
        Arc::clone(
            slots
                .entry(model_id.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }

    /// Drop `slot` if it is still the current attempt for `model_id`.
    fn forget_failed(&self, model_id: &str, slot: &Slot) {
        let mut slots = self.slots.lock();
        if slots.get(model_id).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(model_id);
        }
    }

    /// Initialize `model_id` once; later calls return the same handle.
    ///
    /// Concurrent callers share one load. If it fails, they all receive the
    /// same error and the next call after that starts a fresh load.
    ///
    /// # Errors
    /// `SamplerError::ModelInit` if the provider factory fails.
    #[instrument(skip(self))]
    pub async fn initialize(&self, model_id: &str) -> SamplerResult<ModelHandle> {
        let slot = self.slot(model_id);
        if let Some(handle) = ready(&slot) {
            debug!(model_id, "model already initialized");
            return Ok(handle.clone());
        }

        let outcome = slot
            .get_or_init(|| async {
                info!(model_id, "initializing embedding model");
                match self.factory.load(model_id).await {
                    Ok(provider) => {
                        let handle = ModelHandle::new(model_id, provider);
                        info!(
                            model_id,
                            layers = handle.layer_count(),
                            "embedding model ready"
                        );
                        Ok(handle)
                    }
                    Err(source) => {
                        error!(model_id, error = %source, "embedding model initialization failed");
                        Err(SharedProviderError::from(source))
                    }
                }
            })
            .await;

        match outcome {
            Ok(handle) => Ok(handle.clone()),
            Err(source) => {
                self.forget_failed(model_id, &slot);
                Err(SamplerError::ModelInit {
                    model_id: model_id.to_string(),
                    source: Arc::clone(source),
                })
            }
        }
    }

    /// Handle for an initialized model.
    ///
    /// # Errors
    /// `SamplerError::ModelNotInitialized` naming `operation`.
    pub fn handle(&self, model_id: &str, operation: &str) -> SamplerResult<ModelHandle> {
        self.slots
            .lock()
            .get(model_id)
            .and_then(|slot| ready(slot).cloned())
            .ok_or_else(|| SamplerError::ModelNotInitialized {
                model_id: model_id.to_string(),
                operation: operation.to_string(),
            })
    }

    pub fn is_initialized(&self, model_id: &str) -> bool {
        self.slots
            .lock()
            .get(model_id)
            .is_some_and(|slot| ready(slot).is_some())
    }

    /// Identifiers of ready models, sorted.
    pub fn initialized_models(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .slots
            .lock()
            .iter()
            .filter(|(_, slot)| ready(slot).is_some())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCache")
            .field("initialized", &self.initialized_models())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::HashProviderFactory;
    use async_trait::async_trait;

    struct FailingFactory;

    #[async_trait]
    impl ProviderFactory for FailingFactory {
        async fn load(&self, _model_id: &str) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
            Err("network unreachable".into())
        }
    }

    #[tokio::test]
    async fn test_handle_before_initialize_fails() {
        let cache = ModelCache::new(Arc::new(HashProviderFactory::new(16)));
        let err = cache.handle("m", "embed").expect_err("not initialized");
        assert!(matches!(
            err,
            SamplerError::ModelNotInitialized { ref operation, .. } if operation == "embed"
        ));
        assert!(!cache.is_initialized("m"));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let cache = ModelCache::new(Arc::new(HashProviderFactory::new(16)));
        let first = cache.initialize("Xenova/bert-base-uncased").await.expect("init");
        let second = cache.initialize("Xenova/bert-base-uncased").await.expect("init");
        assert!(Arc::ptr_eq(first.provider(), second.provider()));
        assert_eq!(first.loaded_at(), second.loaded_at());
        assert_eq!(first.layer_count(), 12);
        assert_eq!(cache.initialized_models(), vec!["Xenova/bert-base-uncased".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_initialize_reports_model_init() {
        let cache = ModelCache::new(Arc::new(FailingFactory));
        let err = cache.initialize("m").await.expect_err("must fail");
        assert!(matches!(err, SamplerError::ModelInit { ref model_id, .. } if model_id == "m"));
        assert!(err.to_string().contains("network unreachable"));
        assert!(!cache.is_initialized("m"));
        assert!(cache.initialized_models().is_empty());
    }

    #[tokio::test]
    async fn test_failed_attempt_leaves_no_slot() {
        let cache = ModelCache::new(Arc::new(FailingFactory));
        for id in ["a", "b", "c"] {
            assert!(cache.initialize(id).await.is_err());
        }
        assert!(cache.slots.lock().is_empty());

        let ok = ModelCache::new(Arc::new(HashProviderFactory::new(16)));
        ok.initialize("m").await.expect("init");
        assert_eq!(ok.slots.lock().len(), 1);
    }
}
