//! [Adam][1], adaptive moment estimation.
//! [1]: https://arxiv.org/abs/1412.6980
//!
//! Adam keeps a decaying average of the gradient (first moment) and of the squared
//! gradient (second moment) for every weight and scales each update by their ratio.
//! Weights with consistently large gradients take smaller steps than weights with
//! small or noisy ones. Both averages start at zero and are bias corrected:
//!
//! ```text
//! lr_t = lr * sqrt(1 - beta2^t) / (1 - beta1^t)
//! m    = beta1 * m + (1 - beta1) * g
//! v    = beta2 * v + (1 - beta2) * g^2
//! g   <- lr_t * m / (sqrt(v) + epsilon)
//! ```
//!
//! with `t` the number of the current update, starting at 1.
use ndarray::{ArrayD, ArrayViewMutD, Zip};

use crate::layer::{Layer, LayerGradients};
use crate::solver::*;
use crate::solvers::SGDSolver;

#[derive(Debug, Clone, Default)]
/// Adam solver.
///
/// See [module description][1] for more information.
/// [1]: ./index.html
pub struct Adam {
    first_moment: Vec<ArrayD<f32>>,
    second_moment: Vec<ArrayD<f32>>,
}

impl Adam {
    /// Create a new Adam solver.
    ///
    /// Should not be called directly.
    /// Use [SolverKind::with_config][1] instead.
    ///
    /// [1]: ../../solver/enum.SolverKind.html#method.with_config
    pub fn new() -> Adam {
        Adam {
            first_moment: Vec::new(),
            second_moment: Vec::new(),
        }
    }
}

impl SGDSolver for Adam {
    fn init_history(&mut self, layer: &Layer) {
        let weights = layer.learnable_weights();
        self.first_moment = weights.iter().map(|weight| ArrayD::zeros(weight.raw_dim())).collect();
        self.second_moment = weights.iter().map(|weight| ArrayD::zeros(weight.raw_dim())).collect();
    }

    fn compute_update_value(&mut self,
                            config: &SolverConfig,
                            gradient: &mut ArrayViewMutD<f32>,
                            history_blob_id: usize,
                            global_lr: f32,
                            blob_lr: f32,
                            iter: usize) {
        let (beta1, beta2, epsilon) = (config.beta1, config.beta2, config.epsilon);
        let t = (iter + 1) as i32;
        let local_lr = global_lr * blob_lr * (1f32 - beta2.powi(t)).sqrt() / (1f32 - beta1.powi(t));

        Zip::from(gradient.view_mut())
            .and(&mut self.first_moment[history_blob_id])
            .and(&mut self.second_moment[history_blob_id])
            .for_each(|gradient, m, v| {
                *m = beta1 * *m + (1f32 - beta1) * *gradient;
                *v = beta2 * *v + (1f32 - beta2) * *gradient * *gradient;
                *gradient = local_lr * *m / (v.sqrt() + epsilon);
            });
    }
}

impl_isolver_sgd!(Adam);
