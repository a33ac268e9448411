//! End-to-end sampling of the default tape with a constant-vector provider.

mod common;

use std::sync::Arc;

use num_bigint::BigUint;
use prime_tape_core::{
    encode, glyph_prime_product, prime2_variance, CrossModelSummary, PrimeActivations, Tape,
    DEFAULT_TAPE,
};

use common::{sampler_with, StubFactory};

/// Π p^(3 * occurrences) over the default tape; tanh(1) * 5 floors to 3.
const DEFAULT_TAPE_GODEL: &str = "17989990461687764973176965205225570307010724712000000";

/// Π p over the default tape with separators stripped.
const DEFAULT_TAPE_RAW_PRODUCT: &str = "262025551873885800";

#[tokio::test]
async fn constant_provider_yields_exact_godel_number() {
    let sampler = sampler_with(Arc::new(StubFactory::constant(1.0, 384)));
    let result = sampler
        .sample_tape("Xenova/all-MiniLM-L6-v2", None)
        .await
        .expect("sample default tape");

    assert_eq!(result.tape.as_str(), DEFAULT_TAPE);
    assert_eq!(result.godel.godel_number.to_string(), DEFAULT_TAPE_GODEL);
    assert_eq!(result.godel.hierarchy.size, 21);
    assert_eq!(result.godel.hierarchy.cycles, 3);
    assert_eq!(result.godel.hierarchy.program, DEFAULT_TAPE);

    for activation in result.prime_activations.registry_order() {
        assert_eq!(activation.activation, 1.0);
        assert_eq!(activation.normalized_activation, 1.0f64.tanh());
    }
    let ranked: Vec<u32> = result.prime_activations.ranked().map(|a| a.prime).collect();
    assert_eq!(ranked, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);

    assert_eq!(result.universal_anchor.prime2_activation, 1.0);
    assert_eq!(result.universal_anchor.consistency_score, 1.0f64.tanh());
}

#[tokio::test]
async fn godel_number_exceeds_fixed_width_integers() {
    let n: BigUint = DEFAULT_TAPE_GODEL.parse().expect("decimal");
    assert!(n > BigUint::from(u128::MAX));
}

#[test]
fn raw_and_weighted_variants_differ() {
    let tape = Tape::default();
    let raw = glyph_prime_product(&tape);
    assert_eq!(raw.to_string(), DEFAULT_TAPE_RAW_PRODUCT);

    let weighted = encode(tape.as_str(), &PrimeActivations::from_activations(&[1.0; 10]));
    assert_eq!(weighted.godel_number, raw.pow(3));
    assert_ne!(weighted.godel_number, glyph_prime_product(&tape));
}

#[test]
fn single_glyph_segment_is_prime_power() {
    let mut raw = [0.0; 10];
    raw[9] = -0.5;
    let activations = PrimeActivations::from_activations(&raw);
    let a = activations.by_glyph('🚀').expect("registered").normalized_activation;
    let exponent = ((a.abs() * 5.0).floor() as u32).max(1);
    assert_eq!(
        encode("🚀", &activations).godel_number,
        BigUint::from(29u32).pow(exponent)
    );
}

#[test]
fn foreign_only_tape_encodes_to_one() {
    let activations = PrimeActivations::from_activations(&[0.9; 10]);
    let encoding = encode("hello|world", &activations);
    assert_eq!(encoding.godel_number, BigUint::from(1u32));
    assert_eq!(encoding.hierarchy.size, 11);
}

#[tokio::test]
async fn sampling_is_deterministic_downstream_of_pooled_vector() {
    let sampler = sampler_with(Arc::new(StubFactory::constant(0.3, 40)));
    let a = sampler.sample_tape("m", None).await.expect("sample");
    let b = sampler.sample_tape("m", None).await.expect("sample");
    assert_eq!(a.embedding.pooled_vector, b.embedding.pooled_vector);
    assert_eq!(a.prime_activations, b.prime_activations);
    assert_eq!(a.godel.godel_number, b.godel.godel_number);
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn variance_across_models() {
    let sampler = sampler_with(Arc::new(StubFactory::constant(0.5, 20)));
    let mut results = Vec::new();
    for model in ["Xenova/bert-base-uncased", "Xenova/gpt2", "Xenova/all-MiniLM-L6-v2"] {
        results.push(sampler.sample_tape(model, None).await.expect("sample"));
    }

    assert_eq!(prime2_variance(&results[..1]).expect("variance"), 0.0);
    assert_eq!(prime2_variance(&results).expect("variance"), 0.0);

    let summary = CrossModelSummary::from_results(&results).expect("summary");
    assert_eq!(summary.anchors.len(), 3);
    assert_eq!(summary.anchors[1].model_id, "Xenova/gpt2");
    assert_eq!(summary.mean_prime2_activation, 0.5);
    assert!(summary.anchors.iter().all(|a| a.semantic_drift == 0.0));
}

#[tokio::test]
async fn result_serializes_to_json() {
    let sampler = sampler_with(Arc::new(StubFactory::constant(1.0, 10)));
    let result = sampler.sample_tape("m", None).await.expect("sample");
    let json = serde_json::to_value(&result).expect("serialize");

    assert_eq!(json["godel"]["godelNumber"], DEFAULT_TAPE_GODEL);
    assert_eq!(json["tokenization"]["vocabSize"], 50_000);
    assert_eq!(json["primeActivations"].as_array().map(Vec::len), Some(10));
    assert_eq!(json["universalAnchor"]["semanticDrift"], 0.0);
    assert_eq!(json["tape"], DEFAULT_TAPE);
}
