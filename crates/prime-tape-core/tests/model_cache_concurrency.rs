//! Concurrent initialization through the shared model cache.

mod common;

use std::sync::Arc;
use std::time::Duration;

use prime_tape_core::{ModelCache, ProviderFactory, SamplerError};
use tokio::task::JoinSet;

use common::{sampler_with, StubFactory};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_initialize_loads_once() {
    let factory = Arc::new(StubFactory::slow(Duration::from_millis(50)));
    let cache = Arc::new(ModelCache::new(Arc::clone(&factory) as Arc<dyn ProviderFactory>));

    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let cache = Arc::clone(&cache);
        tasks.spawn(async move { cache.initialize("Xenova/bert-base-uncased").await });
    }

    let mut handles = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        handles.push(joined.expect("task").expect("init"));
    }

    assert_eq!(factory.load_count(), 1);
    let first = &handles[0];
    assert!(handles
        .iter()
        .all(|h| Arc::ptr_eq(h.provider(), first.provider())));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_models_load_independently() {
    let factory = Arc::new(StubFactory::slow(Duration::from_millis(20)));
    let sampler = Arc::new(sampler_with(Arc::clone(&factory)));

    let mut tasks = JoinSet::new();
    for model in ["a", "b", "c", "a", "b", "c"] {
        let sampler = Arc::clone(&sampler);
        tasks.spawn(async move { sampler.sample_tape(model, None).await });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.expect("task").expect("sample");
    }

    assert_eq!(factory.load_count(), 3);
    assert_eq!(
        sampler.cache().initialized_models(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_failed_initialize_loads_once() {
    let factory = Arc::new(StubFactory::slow(Duration::from_millis(50)));
    let cache = Arc::new(ModelCache::new(Arc::clone(&factory) as Arc<dyn ProviderFactory>));

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        tasks.spawn(async move { cache.initialize("missing-model").await });
    }

    let mut sources = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined.expect("task") {
            Err(SamplerError::ModelInit { model_id, source }) => {
                assert_eq!(model_id, "missing-model");
                sources.push(source);
            }
            other => panic!("expected ModelInit, got {other:?}"),
        }
    }

    assert_eq!(factory.load_count(), 1);
    assert_eq!(sources.len(), 8);
    assert!(sources.iter().all(|s| Arc::ptr_eq(s, &sources[0])));
    assert!(!cache.is_initialized("missing-model"));
}

#[tokio::test]
async fn failed_load_can_be_requested_again() {
    let factory = Arc::new(StubFactory::constant(1.0, 16));
    let cache = ModelCache::new(Arc::clone(&factory) as Arc<dyn ProviderFactory>);
    assert!(cache.initialize("missing").await.is_err());
    assert!(cache.initialize("missing").await.is_err());
    assert_eq!(factory.load_count(), 2);
}
