//! Applies the nonlinear TanH function.
//!
//! Non-linearity activation function: y = sinh(x) / cosh(x)
//!
//! Zero-centered alternative to Sigmoid; the derivative is 1 - y^2.
use ndarray::{Array2, Zip};

use super::ActivationFn;

#[derive(Debug, Clone, Copy)]
/// TanH Activation
pub struct TanH;

impl ActivationFn for TanH {
    fn compute_output(&self, input: &Array2<f32>) -> Array2<f32> {
        input.mapv(f32::tanh)
    }

    fn compute_input_gradient(&self,
                              _input: &Array2<f32>,
                              output: &Array2<f32>,
                              output_gradient: &Array2<f32>)
                              -> Array2<f32> {
        Zip::from(output)
            .and(output_gradient)
            .map_collect(|&tanh_x, &gradient| gradient * (1f32 - tanh_x * tanh_x))
    }
}
