//! Cross entropy between target and decoded output.
//!
//! loss = -mean(target * ln(output))
//!
//! Meant for targets and outputs in `[0, 1]`, e.g. a sigmoid or softmax decoder. The
//! output is clamped to a small positive value before taking the logarithm.
use ndarray::{Array2, Zip};

use super::LossFn;

const MIN_PROBABILITY: f32 = 1e-10;

#[derive(Debug, Clone, Copy)]
/// Cross Entropy Loss
pub struct CrossEntropy;

impl LossFn for CrossEntropy {
    fn compute_loss(&self, target: &Array2<f32>, output: &Array2<f32>) -> f32 {
        if output.is_empty() {
            return 0f32;
        }
        let sum = Zip::from(target)
            .and(output)
            .fold(0f32, |sum, &t, &y| sum + t * y.max(MIN_PROBABILITY).ln());
        -sum / output.len() as f32
    }

    fn compute_output_gradient(&self, target: &Array2<f32>, output: &Array2<f32>, _loss: f32) -> Array2<f32> {
        let count = output.len() as f32;
        Zip::from(target)
            .and(output)
            .map_collect(|&t, &y| -t / (count * y.max(MIN_PROBABILITY)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn loss_of_known_batch() {
        let target = array![[1f32, 0f32]];
        let output = array![[0.5f32, 0.5f32]];
        let expected = -(0.5f32.ln()) / 2f32;
        assert!((CrossEntropy.compute_loss(&target, &output) - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_output_stays_finite() {
        let target = array![[1f32]];
        let output = array![[0f32]];
        let loss = CrossEntropy.compute_loss(&target, &output);
        assert!(loss.is_finite());
        assert!(CrossEntropy.compute_output_gradient(&target, &output, loss).iter().all(|g| g.is_finite()));
    }
}
