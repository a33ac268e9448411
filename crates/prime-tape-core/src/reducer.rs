//! Chunk-average dimensionality reduction.

use crate::error::{SamplerError, SamplerResult};

/// Reduce `vector` to `target_dims` components by averaging equal chunks.
///
/// `chunk_size = len / target_dims`; output `i` is the mean of
/// `vector[i * chunk_size..(i + 1) * chunk_size]`. The trailing
/// `len % target_dims` components are dropped.
///
/// # Errors
/// - `SamplerError::InvalidReductionTarget` if `target_dims == 0`
/// - `SamplerError::InsufficientDimensions` if `vector.len() < target_dims`
pub fn reduce(vector: &[f32], target_dims: usize) -> SamplerResult<Vec<f64>> {
    if target_dims == 0 {
        return Err(SamplerError::InvalidReductionTarget { target: target_dims });
    }
    if vector.len() < target_dims {
        return Err(SamplerError::InsufficientDimensions {
            available: vector.len(),
            target: target_dims,
        });
    }

    let chunk_size = vector.len() / target_dims;
    Ok(vector
        .chunks_exact(chunk_size)
        .take(target_dims)
        .map(|chunk| chunk.iter().map(|v| f64::from(*v)).sum::<f64>() / chunk_size as f64)
        .collect())
}
