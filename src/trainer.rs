//! Trains a single autoencoder layer.
//!
//! The [LayerTrainer][1] runs a fixed number of optimization steps on one
//! [Layer][2]: forward the corrupted batch through encoder and tied decoder, compare the
//! reconstruction with the clean target, back-propagate, let the solver compute the
//! update values and apply them. It never touches any other layer of the stack, which
//! is what makes the training of a stack greedy.
//!
//! [1]: ./struct.LayerTrainer.html
//! [2]: ../layer/struct.Layer.html
use std::time::Instant;

use ndarray::Array2;

use crate::error::Result;
use crate::layer::Layer;
use crate::layers::{LossFn, LossKind};
use crate::solver::{ISolver, SolverConfig};
use crate::trace::StepRecord;
use crate::util::check_columns;

#[derive(Debug)]
/// Trains one layer against a loss with a solver configuration.
pub struct LayerTrainer<'a> {
    config: &'a SolverConfig,
    loss: LossKind,
    record: bool,
}

#[derive(Debug, Clone)]
/// Outcome of [LayerTrainer::train](./struct.LayerTrainer.html#method.train).
pub struct TrainReport {
    /// Encoding of the clean target with the trained weights.
    pub encoded: Array2<f32>,
    /// Number of steps that were run.
    pub steps: usize,
    /// Loss of the last step, measured before its update.
    pub loss: f32,
    /// One record per step, empty unless recording was requested.
    pub records: Vec<StepRecord>,
}

impl<'a> LayerTrainer<'a> {
    /// Create a trainer. With `record` every step is captured as a [StepRecord](../trace/struct.StepRecord.html).
    pub fn new(config: &'a SolverConfig, loss: LossKind, record: bool) -> LayerTrainer<'a> {
        LayerTrainer {
            config: config,
            loss: loss,
            record: record,
        }
    }

    /// Train `layer` for `steps` steps to reconstruct `target` from `corrupted`.
    ///
    /// `iteration` only tags the step records.
    pub fn train(&self,
                 layer: &mut Layer,
                 solver: &mut dyn ISolver,
                 corrupted: &Array2<f32>,
                 target: &Array2<f32>,
                 steps: usize,
                 iteration: usize)
                 -> Result<TrainReport> {
        check_columns(layer.input_dim(), corrupted)?;
        check_columns(layer.input_dim(), target)?;

        let started = Instant::now();
        let mut records = Vec::with_capacity(if self.record { steps } else { 0 });
        let mut last_loss = 0f32;
        for step in 0..steps {
            let step_started = Instant::now();

            let forward = layer.forward(corrupted)?;
            let loss = self.loss.compute_loss(target, &forward.decoded);
            let output_gradient = self.loss.compute_output_gradient(target, &forward.decoded, loss);
            let mut gradients = layer.backward(corrupted, &forward, &output_gradient);

            let iter = layer.steps();
            solver.compute_update(self.config, layer, &mut gradients, iter);
            layer.update_weights(&gradients);

            trace!("layer {} step {}: loss {}", layer.index(), step, loss);
            last_loss = loss;
            if self.record {
                records.push(StepRecord {
                    layer: layer.index(),
                    iteration: iteration,
                    step: step,
                    loss: loss,
                    offset: step_started.duration_since(started),
                    duration: step_started.elapsed(),
                });
            }
        }

        Ok(TrainReport {
            encoded: layer.encode(target)?,
            steps: steps,
            loss: last_loss,
            records: records,
        })
    }
}
