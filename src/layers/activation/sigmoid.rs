//! Applies the nonlinear Log-Sigmoid function.
//!
//! Non-linearity activation function: y = (1 + e^(-x))^(-1)
//!
//! A classic choice for autoencoders whose input lies in `[0, 1]`, since the decoded
//! output is squashed into the same range. Its derivative is computed from the output:
//! y * (1 - y).
use ndarray::{Array2, Zip};

use super::ActivationFn;

#[derive(Debug, Clone, Copy)]
/// Sigmoid Activation
pub struct Sigmoid;

impl Sigmoid {
    fn sigmoid(z: f32) -> f32 {
        1f32 / (1f32 + (-z).exp())
    }

    fn sigmoid_prime_precalc(sigmoid_z: f32) -> f32 {
        sigmoid_z * (1f32 - sigmoid_z)
    }
}

impl ActivationFn for Sigmoid {
    fn compute_output(&self, input: &Array2<f32>) -> Array2<f32> {
        input.mapv(Sigmoid::sigmoid)
    }

    fn compute_input_gradient(&self,
                              _input: &Array2<f32>,
                              output: &Array2<f32>,
                              output_gradient: &Array2<f32>)
                              -> Array2<f32> {
        Zip::from(output)
            .and(output_gradient)
            .map_collect(|&sigmoid_x, &gradient| gradient * Sigmoid::sigmoid_prime_precalc(sigmoid_x))
    }
}
