//! A [Stochastic Gradient Descent with Momentum][1]
//! [1]: https://en.wikipedia.org/wiki/Stochastic_gradient_descent#Momentum
//!
//! Momentum in solving neural networks works similar to
//! they way it does in physics.
//! If you travel into a a direction with a high velocity,
//! it becomes very hard to change (or reverse)
//! the direction in which you are moving.
//!
//! Similarly when adjusting gradients during solving,
//! keeping a part of the previous gradient update can make solving faster,
//! since if you keep adjusting the gradients
//! into the same direction you will reach the optimum faster.
//! It also makes solving more stable.
use ndarray::{ArrayD, ArrayViewMutD, Zip};

use crate::layer::{Layer, LayerGradients};
use crate::solver::*;
use crate::solvers::SGDSolver;

#[derive(Debug, Clone, Default)]
/// Stochastic Gradient Descent with Momentum.
///
/// See [module description][1] for more information.
/// [1]: ./index.html
pub struct Momentum {
    /// The gradient update from the previous iteration for each blob.
    history: Vec<ArrayD<f32>>,
}

impl Momentum {
    /// Create a new SGD Momentum solver.
    ///
    /// Should not be called directly.
    /// Use [SolverKind::with_config][1] instead.
    ///
    /// [1]: ../../../solver/enum.SolverKind.html#method.with_config
    pub fn new() -> Momentum {
        Momentum { history: Vec::new() }
    }
}

impl SGDSolver for Momentum {
    /// Initialize the SGD Momentum solver, allocating memory for its history.
    fn init_history(&mut self, layer: &Layer) {
        self.history = layer.learnable_weights()
                            .iter()
                            .map(|weight| ArrayD::zeros(weight.raw_dim()))
                            .collect();
    }

    fn compute_update_value(&mut self,
                            config: &SolverConfig,
                            gradient: &mut ArrayViewMutD<f32>,
                            history_blob_id: usize,
                            global_lr: f32,
                            blob_lr: f32,
                            _iter: usize) {
        let history_blob = &mut self.history[history_blob_id];
        let momentum = config.momentum;
        let local_lr = global_lr * blob_lr;

        // Compute the update to history, then copy it to the parameter diff.
        Zip::from(history_blob)
            .and(gradient.view_mut())
            .for_each(|history, gradient| {
                *history = momentum * *history + local_lr * *gradient;
                *gradient = *history;
            });
    }
}

impl_isolver_sgd!(Momentum);
