//! Provides the trainers for the Layers.
//!
//! The optimal state of an autoencoder layer would be the one where for any given
//! input it would produce a reconstruction perfectly matching the clean target. In that
//! state the loss function would have its [global minimum][minimum].
//! This statement can also be reversed to *if we manage to minimize
//! the loss function of the layer, we reconstruct its input*.
//!
//! We can change the way a layer works by adjusting its individual
//! [weights][weight]. So to optimize the layer we want to adjust
//! the weights in a way that the loss function will be minimized.
//! If we want to know how to correctly adjust a single weight,
//! we have to get to know the effect of that weight
//! on the loss function (= the *gradient*).
//! This is done via [*backpropagation*][backprop] by the [Layer][layer] itself.
//!
//! There are different methods of how a Solver solves for the minimum of the
//! loss function. They differ in how they compute the weight update from the gradient.
//!
//! [layer]: ../layer/index.html
//! [loss]: ../layers/loss/index.html
//! [weight]: https://en.wikipedia.org/wiki/Synaptic_weight
//! [minimum]: http://mathworld.wolfram.com/GlobalMinimum.html
//! [backprop]: https://en.wikipedia.org/wiki/Backpropagation

use ndarray::{ArrayViewD, ArrayViewMutD};

use crate::layer::{Layer, LayerGradients};
use crate::solver::*;

/// Implement [ISolver][1] for solvers that work weight by weight.
/// [1]: ../solver/trait.ISolver.html
macro_rules! impl_isolver_sgd {
    ($t:ty) => (
        impl ISolver for $t {
            fn init(&mut self, layer: &Layer) {
                self.init_history(layer);
            }

            fn compute_update(&mut self, config: &SolverConfig, layer: &Layer, gradients: &mut LayerGradients, iter: usize) {
                let rate = config.get_learning_rate(iter);

                self.clip_gradients(config, gradients);
                let weights = layer.learnable_weights();
                let weight_decay = layer.weights_weight_decay();
                let weights_lr = layer.weights_lr();
                for (weight_id, mut gradient) in gradients.blobs_mut().into_iter().enumerate() {
                    self.regularize(config, &mut gradient, &weights[weight_id], weight_decay[weight_id]);

                    self.compute_update_value(config,
                                              &mut gradient,
                                              weight_id,
                                              rate,
                                              weights_lr[weight_id],
                                              iter);
                }
            }
        }
    )
}

#[allow(unused_import_braces)]
pub use self::adam::{Adam};
#[allow(unused_import_braces)]
pub use self::sgd::{Momentum};
pub mod adam;
pub mod sgd;

/// Shared behaviour of solvers that compute the update of each weight on its own.
pub trait SGDSolver: ISolver {
    /// Allocate the per-weight history of the solver.
    fn init_history(&mut self, layer: &Layer);

    /// Turn `gradient`, the gradient of the weight `history_blob_id`, into its update value.
    fn compute_update_value(&mut self,
                            config: &SolverConfig,
                            gradient: &mut ArrayViewMutD<f32>,
                            history_blob_id: usize,
                            global_lr: f32,
                            blob_lr: f32,
                            iter: usize);

    /// [Clip gradients][1] when they exceed [SolverConfig.clip_gradients][2].
    /// [1]: http://arxiv.org/abs/1211.5063
    /// [2]: ../solver/struct.SolverConfig.html
    ///
    /// When the [L2 norm][3] of all gradients of the layer together exceeds a threshold
    /// it is "clipped" to that threshold. The naming can be misleading since the
    /// gradients are not actually clipped (as in cut off), but rescaled to the threshold.
    ///
    /// [3]: https://en.wikipedia.org/wiki/Norm_(mathematics)#Euclidean_norm
    fn clip_gradients(&self, config: &SolverConfig, gradients: &mut LayerGradients) {
        // skip clipping gradients if SolverConfig.clip_gradients is set to None
        if let Some(clip_threshold) = config.clip_gradients {
            let l2norm_diff = gradients.l2_norm();
            if l2norm_diff > clip_threshold {
                let scale_factor = clip_threshold / l2norm_diff;
                debug!("Gradient clipping: scaling down gradients (L2 norm {} > {}) by scale factor {}",
                       l2norm_diff,
                       clip_threshold,
                       scale_factor);

                for mut gradient in gradients.blobs_mut() {
                    gradient *= scale_factor;
                }
            }
        }
    }

    /// [Regularize][1] the gradient according to the configured [RegularizationMethod][2].
    /// [1]: https://cs231n.github.io/neural-networks-2/#reg
    /// [2]: ../solver/enum.RegularizationMethod.html
    ///
    /// Weights without a weight decay multiplier are left alone.
    fn regularize(&self,
                  config: &SolverConfig,
                  gradient: &mut ArrayViewMutD<f32>,
                  weight: &ArrayViewD<f32>,
                  blob_weight_decay: Option<f32>) {
        if let (Some(global_weight_decay), Some(regularization_method), Some(weight_decay_mult)) =
               (config.weight_decay, config.regularization_method, blob_weight_decay) {
            let local_decay = global_weight_decay * weight_decay_mult;
            match regularization_method {
                RegularizationMethod::L2 => gradient.scaled_add(local_decay, weight),
            }
        }
    }
}
