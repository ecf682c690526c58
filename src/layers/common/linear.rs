//! Applies a linear transformation to the input data `y = x * a + b`
//!
//! The variables are:
//!
//! - `y`: output value
//! - `a`: weight (a trainable weight of the autoencoder layer)
//! - `x`: input value
//! - `b`: bias
//!
//! ## Input
//!
//! The input has two dimensions, **the first dimension is treated as batch size** (`N`)
//! and the transformation is applied to every row, using the same weights and biases.
//!
//! The weight is passed as a view, so the encoder can use the weight matrix as stored
//! while the decoder uses its transpose without copying it.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

#[derive(Debug, Clone, Copy)]
/// Linear Layer
pub struct Linear;

impl Linear {
    /// Computes `input * weight + bias` for a batch `[N × in]` and a weight `[in × out]`.
    pub fn compute_output(&self,
                          input: &Array2<f32>,
                          weight: ArrayView2<f32>,
                          bias: ArrayView1<f32>)
                          -> Array2<f32> {
        input.dot(&weight) + &bias
    }

    /// Gradient w.r.t. the input: `output_gradient * weight^T`.
    pub fn compute_input_gradient(&self,
                                  weight: ArrayView2<f32>,
                                  output_gradient: &Array2<f32>)
                                  -> Array2<f32> {
        output_gradient.dot(&weight.t())
    }

    /// Gradient w.r.t. weight and bias: `(input^T * output_gradient, sum over rows)`.
    pub fn compute_parameters_gradient(&self,
                                       input: &Array2<f32>,
                                       output_gradient: &Array2<f32>)
                                       -> (Array2<f32>, Array1<f32>) {
        let weight_gradient = input.t().dot(output_gradient);
        let bias_gradient = output_gradient.sum_axis(Axis(0));
        (weight_gradient, bias_gradient)
    }
}
