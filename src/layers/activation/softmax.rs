//! Computes the softmax of its input, row by row.
//!
//! Every row of the batch is treated as one sample and normalized into a probability
//! distribution. The maximum of each row is subtracted before exponentiating.
use ndarray::{Array2, Axis};

use super::ActivationFn;

#[derive(Debug, Clone, Copy)]
/// Softmax Activation
pub struct Softmax;

impl ActivationFn for Softmax {
    fn compute_output(&self, input: &Array2<f32>) -> Array2<f32> {
        let mut output = input.clone();
        for mut row in output.rows_mut() {
            let max = row.fold(f32::NEG_INFINITY, |max, &x| max.max(x));
            row.mapv_inplace(|x| (x - max).exp());
            let sum = row.sum();
            row /= sum;
        }
        output
    }

    fn compute_input_gradient(&self,
                              _input: &Array2<f32>,
                              output: &Array2<f32>,
                              output_gradient: &Array2<f32>)
                              -> Array2<f32> {
        // dx = y * (dy - sum(dy * y))
        let dot = (output * output_gradient).sum_axis(Axis(1)).insert_axis(Axis(1));
        output * &(output_gradient - &dot)
    }
}
