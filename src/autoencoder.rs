//! Provides the stacked denoising autoencoder model.
//!
//! A [StackedAutoencoder][1] is an ordered stack of [Layers][2]. Layer `0` encodes the
//! input batch, every following layer encodes the encoding of the layer below it. The
//! widths of the encodings are the `dims` of the [configuration][3].
//!
//! ## Training
//!
//! [fit][4] trains the stack greedily: every layer is trained on its own for its number
//! of epochs to reconstruct its clean input from a corrupted copy, then the clean
//! encoding of the trained layer becomes the input of the next one. Gradients never
//! flow from one layer into the layer below it.
//!
//! The layers are created on the first call of [fit][4] (or [transform][5]), from the
//! width of the batch it is called with. Their dimensions never change afterwards.
//!
//! ## Lifecycle
//!
//! A model is in [Phase::Building][6] until its first `fit` and in
//! [Phase::Running][6] afterwards. The [graph][7] uses the phase to freeze the topology
//! once training started.
//!
//! [1]: ./struct.StackedAutoencoder.html
//! [2]: ../layer/struct.Layer.html
//! [3]: ../config/struct.AutoencoderConfig.html
//! [4]: ./struct.StackedAutoencoder.html#method.fit
//! [5]: ./struct.StackedAutoencoder.html#method.transform
//! [6]: ./enum.Phase.html
//! [7]: ../graph/index.html
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::backend::Backend;
use crate::checkpoint::Checkpoint;
use crate::config::AutoencoderConfig;
use crate::error::{Error, Result};
use crate::layer::{Layer, LEARNABLE_WEIGHTS};
use crate::layers::{Activation, NoiseSpec};
use crate::solver::{ISolver, SolverConfig};
use crate::trace::{write_timeline, StepRecord};
use crate::trainer::LayerTrainer;
use crate::util::{check_columns, OutputFolder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Lifecycle state of a model.
pub enum Phase {
    /// No `fit` has happened yet, the topology around the model may change.
    Building,
    /// The model has been trained at least once.
    Running,
}

#[derive(Debug)]
/// Stack of tied-weight denoising autoencoder layers.
pub struct StackedAutoencoder {
    name: String,
    config: AutoencoderConfig,
    solver_config: SolverConfig,
    encoding: Vec<Activation>,
    decoding: Vec<Activation>,

    /// The number of `fit` calls so far.
    iteration: usize,

    layers: Vec<Layer>,
    solvers: Vec<Box<dyn ISolver>>,
    last_output: Option<Array2<f32>>,
    step_records: Vec<StepRecord>,

    backend: Backend,
}

impl StackedAutoencoder {
    /// Create a model from a [AutoencoderConfig][1].
    /// [1]: ../config/struct.AutoencoderConfig.html
    ///
    /// Fails if the configuration does not validate. The layer stack stays empty until
    /// the model sees its first batch.
    pub fn from_config(config: &AutoencoderConfig) -> Result<StackedAutoencoder> {
        config.validate()?;
        let encoding = config.encoding_activations()?;
        let decoding = config.decoding_activations()?;

        let mut backend = Backend::new(&config.name, config.seed);
        let name = format!("{}-{:08x}", config.name, backend.next_tag());
        backend.set_owner(&name);
        info!("Created autoencoder {} with layers {:?}", name, config.dims);

        Ok(StackedAutoencoder {
            name: name,
            config: config.clone(),
            solver_config: config.solver_config(),
            encoding: encoding,
            decoding: decoding,
            iteration: 0,
            layers: Vec::new(),
            solvers: Vec::new(),
            last_output: None,
            step_records: Vec::new(),
            backend: backend,
        })
    }

    /// Train every layer once, greedily, on `batch`.
    ///
    /// Layer `i` is trained for `epochs[i]` steps to reconstruct its clean input from a
    /// corrupted copy. Its clean encoding is the input of layer `i + 1`.
    pub fn fit(&mut self, batch: &Array2<f32>) -> Result<()> {
        self.check_input(batch)?;
        self.iteration += 1;
        self.materialize(batch.ncols());
        self.step_records.clear();

        let record = self.config.metadata;
        let timeline = match self.config.output() {
            Some(ref output) if record && self.config.timeline => Some(output.clone()),
            _ => None,
        };
        let trainer = LayerTrainer::new(&self.solver_config, self.config.loss, record);
        let mut working = batch.clone();
        for (layer, solver) in self.layers.iter_mut().zip(self.solvers.iter_mut()) {
            let index = layer.index();
            let epochs = self.config.epochs[index];
            info!("{}: training layer {} for {} steps", self.name, index, epochs);

            let corrupted = match self.config.noise {
                NoiseSpec::None => None,
                noise => Some(noise.corrupt(&working, self.backend.rng())),
            };
            let report = trainer.train(layer,
                                       &mut **solver,
                                       corrupted.as_ref().unwrap_or(&working),
                                       &working,
                                       epochs,
                                       self.iteration)?;
            info!("{}: layer {} finished with loss {}", self.name, index, report.loss);

            if let Some(ref output) = timeline {
                write_timeline(output, &self.name, index, self.iteration, &report.records)?;
            }
            self.step_records.extend(report.records);
            working = report.encoded;
        }
        Ok(())
    }

    /// Encode `batch` through the whole stack without training.
    ///
    /// Before the first `fit` the stack is created from the width of `batch`, so the
    /// result is computed with untrained weights.
    pub fn transform(&mut self, batch: &Array2<f32>) -> Result<Array2<f32>> {
        self.check_input(batch)?;
        if self.layers.is_empty() {
            debug!("{}: building untrained layers for inference", self.name);
            self.materialize(batch.ncols());
        }

        let mut output = batch.clone();
        for layer in &self.layers {
            output = layer.encode(&output)?;
        }
        self.last_output = Some(output.clone());
        Ok(output)
    }

    /// [fit](#method.fit) followed by [transform](#method.transform) on the same batch.
    pub fn fit_transform(&mut self, batch: &Array2<f32>) -> Result<Array2<f32>> {
        self.fit(batch)?;
        self.transform(batch)
    }

    /// Write the learnable weights of every layer to
    /// `<output>/checkpoints/<name>_<iteration>.json`.
    pub fn save(&self, output: &OutputFolder) -> Result<PathBuf> {
        let mut checkpoint = Checkpoint::new(&self.name, self.iteration);
        for layer in &self.layers {
            for (name, weight) in layer.learnable_weights_names().iter().zip(layer.learnable_weights()) {
                checkpoint.insert(layer.index(), name, weight);
            }
        }
        let path = checkpoint.save(output)?;
        info!("{}: saved checkpoint to {}", self.name, path.display());
        Ok(path)
    }

    /// Restore the learnable weights written by [save](#method.save).
    ///
    /// Layers that don't exist yet are created from the stored shapes. Fails without
    /// changing the model if the checkpoint does not fit its configuration. The
    /// iteration counter is not restored.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let checkpoint = Checkpoint::load(path)?;
        if checkpoint.depth() != self.config.dims.len() {
            return Err(Error::Checkpoint(format!("{} holds {} layers, {} has {}",
                                                 path.display(),
                                                 checkpoint.depth(),
                                                 self.name,
                                                 self.config.dims.len())));
        }

        let mut layers = if self.layers.is_empty() {
            let input_dim = checkpoint.tensor(0, "encode_weights")?
                                      .shape()
                                      .first()
                                      .cloned()
                                      .ok_or_else(|| Error::Checkpoint("layer 0 weights have no dimensions".to_owned()))?;
            self.build_layers(input_dim)
        } else {
            self.layers.clone()
        };
        for layer in layers.iter_mut() {
            for name in LEARNABLE_WEIGHTS.iter() {
                let tensor = checkpoint.tensor(layer.index(), name)?;
                layer.set_learnable_weight(name, tensor)?;
            }
        }

        if self.solvers.len() != layers.len() {
            self.solvers = self.build_solvers(&layers);
        }
        self.layers = layers;
        info!("{}: restored {} layers from {}", self.name, self.layers.len(), path.display());
        Ok(())
    }

    /// Unique name of the model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration the model was created with.
    pub fn config(&self) -> &AutoencoderConfig {
        &self.config
    }

    /// Number of `fit` calls so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// [Phase::Building](./enum.Phase.html) until the first `fit`.
    pub fn phase(&self) -> Phase {
        if self.iteration == 0 {
            Phase::Building
        } else {
            Phase::Running
        }
    }

    /// The layers, empty until the first batch.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Width of the input, known once the layers exist.
    pub fn input_dim(&self) -> Option<usize> {
        self.layers.first().map(|layer| layer.input_dim())
    }

    /// Width of the encoding produced by the top layer.
    pub fn output_dim(&self) -> usize {
        self.config.dims.last().cloned().unwrap_or(0)
    }

    /// Result of the most recent [transform](#method.transform).
    pub fn last_output(&self) -> Option<&Array2<f32>> {
        self.last_output.as_ref()
    }

    /// Records of every step of the most recent `fit`, empty unless metadata capture is on.
    pub fn step_records(&self) -> &[StepRecord] {
        &self.step_records
    }

    fn check_input(&self, batch: &Array2<f32>) -> Result<()> {
        match self.input_dim() {
            Some(input_dim) => check_columns(input_dim, batch),
            None if batch.ncols() == 0 => {
                Err(Error::InvalidConfig(format!("{} can't build layers for a batch without columns", self.name)))
            }
            None => Ok(()),
        }
    }

    /// Create layers and solvers, once.
    fn materialize(&mut self, input_dim: usize) {
        if !self.layers.is_empty() {
            return;
        }
        let layers = self.build_layers(input_dim);
        self.solvers = self.build_solvers(&layers);
        self.layers = layers;
        debug!("{}: created {} layers for input width {}", self.name, self.layers.len(), input_dim);
    }

    fn build_layers(&mut self, input_dim: usize) -> Vec<Layer> {
        let mut layers = Vec::with_capacity(self.config.dims.len());
        let mut width = input_dim;
        for (index, hidden_dim) in self.config.dims.iter().cloned().enumerate() {
            layers.push(Layer::new(index,
                                   width,
                                   hidden_dim,
                                   self.encoding[index],
                                   self.decoding[index],
                                   &self.config.weight_filler,
                                   &self.config.bias_filler,
                                   self.backend.rng()));
            width = hidden_dim;
        }
        layers
    }

    fn build_solvers(&self, layers: &[Layer]) -> Vec<Box<dyn ISolver>> {
        layers.iter()
              .map(|layer| {
                  let mut solver = self.solver_config.solver.with_config(&self.solver_config);
                  solver.init(layer);
                  solver
              })
              .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AutoencoderConfig {
        AutoencoderConfig {
            seed: Some(5),
            ..AutoencoderConfig::new(vec![3, 2], vec![2, 3])
        }
    }

    #[test]
    fn name_carries_hex_suffix() {
        let model = StackedAutoencoder::from_config(&config()).unwrap();
        let suffix = model.name().trim_start_matches("ae-");
        assert_eq!(8, suffix.len());
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn phase_follows_iteration() {
        let mut model = StackedAutoencoder::from_config(&config()).unwrap();
        assert_eq!(Phase::Building, model.phase());
        model.fit(&Array2::from_elem((4, 5), 0.5)).unwrap();
        assert_eq!(Phase::Running, model.phase());
        assert_eq!(1, model.iteration());
        assert_eq!(2, model.layers()[0].steps());
        assert_eq!(3, model.layers()[1].steps());
    }

    #[test]
    fn wrong_width_leaves_model_untouched() {
        let mut model = StackedAutoencoder::from_config(&config()).unwrap();
        model.fit(&Array2::from_elem((4, 5), 0.5)).unwrap();
        assert!(model.fit(&Array2::from_elem((4, 6), 0.5)).is_err());
        assert_eq!(1, model.iteration());
        assert!(model.transform(&Array2::from_elem((1, 6), 0.5)).is_err());
    }
}
