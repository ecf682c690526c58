//! Applies the nonlinear Rectified Linear Unit.
//!
//! Non-linearity activation function: y = max(0, x)
//!
//! The gradient passes through where the input was positive and is zero elsewhere.
use ndarray::{Array2, Zip};

use super::ActivationFn;

#[derive(Debug, Clone, Copy)]
/// ReLU Activation
pub struct ReLU;

impl ActivationFn for ReLU {
    fn compute_output(&self, input: &Array2<f32>) -> Array2<f32> {
        input.mapv(|x| x.max(0f32))
    }

    fn compute_input_gradient(&self,
                              input: &Array2<f32>,
                              _output: &Array2<f32>,
                              output_gradient: &Array2<f32>)
                              -> Array2<f32> {
        Zip::from(input)
            .and(output_gradient)
            .map_collect(|&x, &gradient| if x > 0f32 { gradient } else { 0f32 })
    }
}
