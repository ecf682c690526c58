//! Provides nonlinear activation methods.
//!
//! Activations take the linear projection of a batch and apply an element-wise (or, for
//! softmax, row-wise) function, producing an output of the same shape. Thanks to the
//! nonlinearity of the activation methods, the autoencoder layers can 'learn' and detect
//! nonlinearities in their input.
//!
//! Every layer of a stack has one activation for its encoding and one for its decoding.
//! Sigmoid is the classic choice for inputs in `[0, 1]`, Linear is useful for a decoder
//! that reconstructs unbounded values.
//!
//! The activation function is also sometimes called transfer function.
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use self::relu::ReLU;
pub use self::sigmoid::Sigmoid;
pub use self::softmax::Softmax;
pub use self::tanh::TanH;

pub mod relu;
pub mod sigmoid;
pub mod softmax;
pub mod tanh;

/// Forward and backward computation of an activation function.
pub trait ActivationFn {
    /// Applies the activation to the linear projection `input`.
    fn compute_output(&self, input: &Array2<f32>) -> Array2<f32>;

    /// Computes the gradient w.r.t. the activation input.
    ///
    /// `output` is the result of [compute_output](#tymethod.compute_output) for `input`,
    /// `output_gradient` the gradient of the loss w.r.t. `output`.
    fn compute_input_gradient(&self,
                              input: &Array2<f32>,
                              output: &Array2<f32>,
                              output_gradient: &Array2<f32>)
                              -> Array2<f32>;
}

#[derive(Debug, Clone, Copy)]
/// Identity activation, passes the linear projection through unchanged.
pub struct Identity;

impl ActivationFn for Identity {
    fn compute_output(&self, input: &Array2<f32>) -> Array2<f32> {
        input.clone()
    }

    fn compute_input_gradient(&self,
                              _input: &Array2<f32>,
                              _output: &Array2<f32>,
                              output_gradient: &Array2<f32>)
                              -> Array2<f32> {
        output_gradient.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// All supported activation kinds.
pub enum Activation {
    /// See [Sigmoid](./sigmoid/struct.Sigmoid.html).
    Sigmoid,
    /// See [TanH](./tanh/struct.TanH.html).
    Tanh,
    /// See [ReLU](./relu/struct.ReLU.html).
    Relu,
    /// See [Identity](./struct.Identity.html).
    Linear,
    /// See [Softmax](./softmax/struct.Softmax.html).
    Softmax,
}

impl Activation {
    /// Every supported kind, in the order they are listed in error messages.
    pub const ALL: [Activation; 5] = [Activation::Sigmoid,
                                      Activation::Tanh,
                                      Activation::Relu,
                                      Activation::Linear,
                                      Activation::Softmax];

    /// The canonical name used in configurations.
    pub fn name(&self) -> &'static str {
        match *self {
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::Relu => "relu",
            Activation::Linear => "linear",
            Activation::Softmax => "softmax",
        }
    }

    fn worker(&self) -> &'static dyn ActivationFn {
        match *self {
            Activation::Sigmoid => &Sigmoid,
            Activation::Tanh => &TanH,
            Activation::Relu => &ReLU,
            Activation::Linear => &Identity,
            Activation::Softmax => &Softmax,
        }
    }
}

impl ActivationFn for Activation {
    fn compute_output(&self, input: &Array2<f32>) -> Array2<f32> {
        self.worker().compute_output(input)
    }

    fn compute_input_gradient(&self,
                              input: &Array2<f32>,
                              output: &Array2<f32>,
                              output_gradient: &Array2<f32>)
                              -> Array2<f32> {
        self.worker().compute_input_gradient(input, output, output_gradient)
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(name: &str) -> Result<Activation, Error> {
        Activation::ALL
            .iter()
            .find(|activation| activation.name() == name)
            .cloned()
            .ok_or_else(|| Error::UnknownActivation(name.to_owned()))
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
