//! Provides the generics and interfaces for the specific Solvers.
//!
//! A Solver turns the gradients of a [Layer][layer] into the values that get
//! subtracted from its weights. Every layer of a stack owns one solver instance, since
//! most solvers keep per-weight history between updates.
//!
//! See [Solvers][solvers]
//! [solvers]: ../solvers/index.html
//! [layer]: ../layer/index.html
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::{Layer, LayerGradients};
use crate::solvers::*;

/// Implementation of a specific Solver.
///
/// See [Solvers][1]
/// [1]: ../solvers/index.html
pub trait ISolver {
    /// Initialize the solver, setting up any layer related data.
    fn init(&mut self, layer: &Layer);

    /// Compute the update values of the layer's weights from its gradients.
    ///
    /// The [second phase of backpropagation learning][1].
    /// `gradients` is transformed in place; afterwards it holds the values that
    /// [Layer::update_weights][2] subtracts from the weights.
    ///
    /// [1]: https://en.wikipedia.org/wiki/Backpropagation#Phase_2:_Weight_update
    /// [2]: ../layer/struct.Layer.html#method.update_weights
    fn compute_update(&mut self, config: &SolverConfig, layer: &Layer, gradients: &mut LayerGradients, iter: usize);
}

impl fmt::Debug for dyn ISolver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", "ISolver")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Configuration for a Solver
pub struct SolverConfig {
    /// The [Solver implementation][1] to be used.
    /// [1]: ../solvers/index.html
    ///
    /// Default: Adam
    pub solver: SolverKind,
    /// The learning rate policy to be used.
    ///
    /// Default: Fixed
    pub lr_policy: LRPolicy,
    /// The base learning rate.
    ///
    /// For an autoencoder this is replaced by its configured `learning_rate`.
    ///
    /// Default: 0.01
    pub base_lr: f32,
    /// gamma as used in the calculation of most learning rate policies.
    ///
    /// Default: 0.1
    pub gamma: f32,
    /// The stepsize used in Step learning policies.
    ///
    /// Default: 10
    pub stepsize: usize,
    /// The threshold for clipping gradients.
    ///
    /// Gradient values will be scaled to their [L2 norm][1] of length `clip_gradients`
    /// if their L2 norm is larger than `clip_gradients`.
    /// If set to `None` gradients will not be clipped.
    ///
    /// [1]: https://en.wikipedia.org/wiki/Norm_(mathematics)#Euclidean_norm
    ///
    /// Default: None
    pub clip_gradients: Option<f32>,
    /// The global [weight decay][1] multiplier for [regularization][2].
    /// [1]: http://www.alglib.net/dataanalysis/improvinggeneralization.php#header3
    /// [2]: https://cs231n.github.io/neural-networks-2/#reg
    ///
    /// If set to `None` no regularization will be performed.
    ///
    /// Default: None
    pub weight_decay: Option<f32>,
    /// The method of [regularization][1] to use.
    /// [1]: https://cs231n.github.io/neural-networks-2/#reg
    ///
    /// See [RegularizationMethod][2] for all implemented methods.
    ///
    /// [2]: ./enum.RegularizationMethod.html
    ///
    /// Default: None
    pub regularization_method: Option<RegularizationMethod>,
    /// The [momentum][1] multiplier for [SGD solvers][2].
    /// [1]: https://en.wikipedia.org/wiki/Stochastic_gradient_descent#Momentum
    /// [2]: ../solvers/sgd/index.html
    ///
    /// The value should always be between 0 and 1 and dictates how much of the previous
    /// gradient update will be added to the current one.
    ///
    /// Default: 0
    pub momentum: f32,
    /// Decay rate of the first moment estimate of [Adam][1].
    /// [1]: ../solvers/adam/index.html
    ///
    /// Default: 0.9
    pub beta1: f32,
    /// Decay rate of the second moment estimate of [Adam][1].
    /// [1]: ../solvers/adam/index.html
    ///
    /// Default: 0.999
    pub beta2: f32,
    /// Small constant added to the denominator of [Adam][1].
    /// [1]: ../solvers/adam/index.html
    ///
    /// Default: 1e-8
    pub epsilon: f32,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            solver: SolverKind::Adam,

            lr_policy: LRPolicy::Fixed,
            base_lr: 0.01f32,
            gamma: 0.1f32,
            stepsize: 10,

            clip_gradients: None,

            weight_decay: None,
            regularization_method: None,

            momentum: 0f32,

            beta1: 0.9f32,
            beta2: 0.999f32,
            epsilon: 1e-8f32,
        }
    }
}

impl SolverConfig {
    /// Return the learning rate for a supplied iteration.
    ///
    /// The way the learning rate is calculated depends on the configured [LRPolicy][1].
    ///
    /// [1]: ./enum.LRPolicy.html
    ///
    /// Used by the solvers to calculate the learning rate for the current iteration, which
    /// is the number of updates the layer has received so far.
    pub fn get_learning_rate(&self, iter: usize) -> f32 {
        match self.lr_policy() {
            LRPolicy::Fixed => {
                self.base_lr()
            }
            LRPolicy::Step => {
                let current_step = self.step(iter);
                self.base_lr() * self.gamma().powf(current_step as f32)
            }
            LRPolicy::Exp => {
                self.base_lr() * self.gamma().powf(iter as f32)
            }
        }
    }

    /// Check the parameters for values no solver can work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_lr.is_finite() && self.base_lr > 0f32) {
            return Err(Error::InvalidConfig(format!("learning rate must be positive, got {}", self.base_lr)));
        }
        if self.lr_policy == LRPolicy::Step && self.stepsize == 0 {
            return Err(Error::InvalidConfig("the step policy needs a stepsize of at least 1".to_owned()));
        }
        if let Some(threshold) = self.clip_gradients {
            if !(threshold > 0f32) {
                return Err(Error::InvalidConfig(format!("gradient clipping threshold must be positive, got {}", threshold)));
            }
        }
        if !(0f32..1f32).contains(&self.beta1) || !(0f32..1f32).contains(&self.beta2) {
            return Err(Error::InvalidConfig(format!("adam decay rates must be in [0, 1), got {} and {}",
                                                    self.beta1,
                                                    self.beta2)));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0f32) {
            return Err(Error::InvalidConfig(format!("adam epsilon must be positive, got {}", self.epsilon)));
        }
        Ok(())
    }

    /// Return current step at iteration `iter`.
    ///
    /// Small helper for learning rate calculation.
    fn step(&self, iter: usize) -> usize {
        iter / self.stepsize()
    }

    /// Return learning rate policy.
    fn lr_policy(&self) -> LRPolicy {
        self.lr_policy
    }

    /// Return the base learning rate.
    fn base_lr(&self) -> f32 {
        self.base_lr
    }

    /// Return the gamma for learning rate calculations.
    fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Return the stepsize for learning rate calculations.
    fn stepsize(&self) -> usize {
        self.stepsize
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// All available types of solvers.
pub enum SolverKind {
    /// Stochastic Gradient Descent.
    /// See [SGDKind][1] for all available SGD solvers.
    /// [1]: ./enum.SGDKind.html
    SGD(SGDKind),
    /// Adaptive moment estimation. See [implementation][1]
    /// [1]: ../solvers/adam/index.html
    Adam,
}

impl SolverKind {
    /// Create a Solver of the specified kind.
    pub fn with_config(&self, config: &SolverConfig) -> Box<dyn ISolver> {
        match *self {
            SolverKind::SGD(sgd) => {
                sgd.with_config(config)
            }
            SolverKind::Adam => {
                Box::new(Adam::new())
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// All available types of Stochastic Gradient Descent solvers.
pub enum SGDKind {
    /// Stochastic Gradient Descent with Momentum. See [implementation][1]
    /// [1]: ../solvers/sgd/momentum/index.html
    Momentum,
}

impl SGDKind {
    /// Create a Solver of the specified kind.
    pub fn with_config(&self, _config: &SolverConfig) -> Box<dyn ISolver> {
        match *self {
            SGDKind::Momentum => {
                Box::new(Momentum::new())
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Learning Rate Policy for a Solver
///
/// The variables mentioned below are defined in the [SolverConfig][2] apart from
/// iter, which is the current iteration of the solver, that is supplied as a parameter
/// for the learning rate calculation.
///
/// [2]: ./struct.SolverConfig.html
pub enum LRPolicy {
    /// always return base_lr
    Fixed,
    /// learning rate decays every `step` iterations.
    /// return base_lr * gamma ^ (floor(iter / step))
    Step,
    /// return base_lr * gamma ^ iter
    Exp,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// [Regularization][1] method for a Solver.
/// [1]: https://cs231n.github.io/neural-networks-2/#reg
pub enum RegularizationMethod {
    /// L2 regularization
    L2,
}
