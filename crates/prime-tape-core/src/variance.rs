//! Cross-model statistics over the universal anchor.

use serde::Serialize;

use crate::error::{SamplerError, SamplerResult};
use crate::sampler::SamplingResult;

/// Population variance (divisor N) of `prime2_activation` across results.
///
/// # Errors
/// `SamplerError::EmptyResults` for an empty slice.
pub fn prime2_variance(results: &[SamplingResult]) -> SamplerResult<f64> {
    let values: Vec<f64> = results
        .iter()
        .map(|r| r.universal_anchor.prime2_activation)
        .collect();
    population_variance(&values)
}

/// Welford running mean and population variance.
///
/// Identical inputs give exactly zero variance.
fn mean_and_variance(values: &[f64]) -> SamplerResult<(f64, f64)> {
    if values.is_empty() {
        return Err(SamplerError::EmptyResults);
    }
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &x) in values.iter().enumerate() {
        let delta = x - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (x - mean);
    }
    Ok((mean, m2 / values.len() as f64))
}

fn population_variance(values: &[f64]) -> SamplerResult<f64> {
    mean_and_variance(values).map(|(_, variance)| variance)
}

/// One model's prime-2 activation and its distance from the cross-model mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAnchor {
    pub model_id: String,
    pub prime2_activation: f64,
    pub semantic_drift: f64,
}

/// Summary of the universal anchor across several sampling results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossModelSummary {
    pub anchors: Vec<ModelAnchor>,
    pub mean_prime2_activation: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl CrossModelSummary {
    /// # Errors
    /// `SamplerError::EmptyResults` for an empty slice.
    pub fn from_results(results: &[SamplingResult]) -> SamplerResult<Self> {
        let values: Vec<f64> = results
            .iter()
            .map(|r| r.universal_anchor.prime2_activation)
            .collect();
        let (mean, variance) = mean_and_variance(&values)?;

        let anchors = results
            .iter()
            .zip(&values)
            .map(|(r, &x)| ModelAnchor {
                model_id: r.model_id().to_string(),
                prime2_activation: x,
                semantic_drift: (x - mean).abs(),
            })
            .collect();

        Ok(Self {
            anchors,
            mean_prime2_activation: mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}
