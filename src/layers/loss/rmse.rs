//! Root of the mean squared difference between target and output.
//!
//! loss = sqrt(mean((target - output)^2))
//!
//! The mean is taken over every element of the batch, so the value does not depend on
//! the batch size.
use ndarray::Array2;

use super::LossFn;

// Below this loss the reconstruction is treated as exact and the gradient as zero.
const EXACT: f32 = 1e-12;

#[derive(Debug, Clone, Copy)]
/// Root Mean Squared Error Loss
pub struct RootMeanSquaredError;

impl LossFn for RootMeanSquaredError {
    fn compute_loss(&self, target: &Array2<f32>, output: &Array2<f32>) -> f32 {
        let difference = target - output;
        difference.mapv(|d| d * d).mean().unwrap_or(0f32).sqrt()
    }

    fn compute_output_gradient(&self, target: &Array2<f32>, output: &Array2<f32>, loss: f32) -> Array2<f32> {
        if loss <= EXACT || output.is_empty() {
            return Array2::zeros(output.raw_dim());
        }
        // d/dy sqrt(mean((t - y)^2)) = (y - t) / (count * loss)
        let scale = 1f32 / (output.len() as f32 * loss);
        (output - target) * scale
    }
}
