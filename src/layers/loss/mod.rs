//! Provides methods to calculate the reconstruction loss of a decoded batch.
//!
//! A loss compares the decoded output of a layer with the clean target and assigns a
//! scalar cost to minimize, together with the gradient of that cost w.r.t. the decoded
//! output, which is where backpropagation through the layer starts.
//!
//! A loss function is also sometimes called cost function.
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use self::cross_entropy::CrossEntropy;
pub use self::rmse::RootMeanSquaredError;

pub mod cross_entropy;
pub mod rmse;

/// Computation of a reconstruction loss and its gradient.
pub trait LossFn {
    /// Computes the scalar loss of `output` against `target`.
    fn compute_loss(&self, target: &Array2<f32>, output: &Array2<f32>) -> f32;

    /// Computes the gradient of the loss w.r.t. `output`.
    ///
    /// `loss` is the value previously returned by [compute_loss](#tymethod.compute_loss).
    fn compute_output_gradient(&self, target: &Array2<f32>, output: &Array2<f32>, loss: f32) -> Array2<f32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// All supported reconstruction losses.
pub enum LossKind {
    /// See [RootMeanSquaredError](./rmse/struct.RootMeanSquaredError.html).
    #[serde(rename = "rmse")]
    Rmse,
    /// See [CrossEntropy](./cross_entropy/struct.CrossEntropy.html).
    #[serde(rename = "cross-entropy")]
    CrossEntropy,
}

impl LossKind {
    /// The canonical name used in configurations.
    pub fn name(&self) -> &'static str {
        match *self {
            LossKind::Rmse => "rmse",
            LossKind::CrossEntropy => "cross-entropy",
        }
    }

    fn worker(&self) -> &'static dyn LossFn {
        match *self {
            LossKind::Rmse => &RootMeanSquaredError,
            LossKind::CrossEntropy => &CrossEntropy,
        }
    }
}

impl LossFn for LossKind {
    fn compute_loss(&self, target: &Array2<f32>, output: &Array2<f32>) -> f32 {
        self.worker().compute_loss(target, output)
    }

    fn compute_output_gradient(&self, target: &Array2<f32>, output: &Array2<f32>, loss: f32) -> Array2<f32> {
        self.worker().compute_output_gradient(target, output, loss)
    }
}

impl Default for LossKind {
    fn default() -> LossKind {
        LossKind::Rmse
    }
}

impl FromStr for LossKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<LossKind, Error> {
        match name {
            "rmse" => Ok(LossKind::Rmse),
            "cross-entropy" => Ok(LossKind::CrossEntropy),
            other => Err(Error::UnsupportedLoss(other.to_owned())),
        }
    }
}

impl fmt::Display for LossKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
