//! Provides the configuration of a stacked autoencoder.
//!
//! An [AutoencoderConfig][1] holds every hyperparameter of a model. It can be built in
//! code, starting from its `Default`, or parsed from JSON with
//! [from_json][2]. Every field has a default, so a JSON document only has to name what
//! differs:
//!
//! ```
//! # use lamina::AutoencoderConfig;
//! let config = AutoencoderConfig::from_json(r#"{
//!     "dims": [8, 4],
//!     "epochs": [5, 5],
//!     "noise": "mask-0.3",
//!     "loss": "cross-entropy"
//! }"#).unwrap();
//! assert_eq!(2, config.dims.len());
//! ```
//!
//! [1]: ./struct.AutoencoderConfig.html
//! [2]: ./struct.AutoencoderConfig.html#method.from_json
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layers::{Activation, LossKind, NoiseSpec};
use crate::solver::SolverConfig;
use crate::util::OutputFolder;
use crate::weight::FillerType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Hyperparameters of a [StackedAutoencoder](../autoencoder/struct.StackedAutoencoder.html).
pub struct AutoencoderConfig {
    /// Base of the model name. A random 8 digit hex suffix is appended to it.
    ///
    /// Default: "ae"
    pub name: String,
    /// Width of the encoding of every layer, first layer first.
    ///
    /// The number of entries is the depth of the stack.
    ///
    /// Default: []
    pub dims: Vec<usize>,
    /// Activation for encoding and decoding of every layer.
    ///
    /// A single entry applies to every layer. Used wherever `encoding_activations`
    /// or `decoding_activations` are not set.
    ///
    /// Default: [sigmoid]
    pub activations: Vec<Activation>,
    /// Per-layer encoding activations.
    ///
    /// Default: None
    pub encoding_activations: Option<Vec<Activation>>,
    /// Per-layer decoding activations.
    ///
    /// Default: None
    pub decoding_activations: Option<Vec<Activation>>,
    /// Number of training steps of every layer per `fit`.
    ///
    /// Default: []
    pub epochs: Vec<usize>,
    /// Corruption of the input of every layer during training.
    ///
    /// Default: none
    pub noise: NoiseSpec,
    /// Reconstruction loss.
    ///
    /// Default: rmse
    pub loss: LossKind,
    /// The learning rate. Replaces the `base_lr` of the solver configuration.
    ///
    /// Default: 0.01
    pub learning_rate: f32,
    /// Configuration of the per-layer solvers.
    ///
    /// Default: Adam, see [SolverConfig](../solver/struct.SolverConfig.html)
    pub solver: SolverConfig,
    /// Initialization of the encode weights.
    ///
    /// Default: Glorot
    pub weight_filler: FillerType,
    /// Initialization of the encode and decode biases.
    ///
    /// Default: Constant 0
    pub bias_filler: FillerType,
    /// Seed of the model's random number generator. Without one training is not
    /// reproducible.
    ///
    /// Default: None
    pub seed: Option<u64>,
    /// Record every training step.
    ///
    /// Default: false
    pub metadata: bool,
    /// Write the recorded steps as timeline files. Needs `metadata` and `output_folder`.
    ///
    /// Default: false
    pub timeline: bool,
    /// Root for timelines and checkpoints.
    ///
    /// Default: None
    pub output_folder: Option<PathBuf>,
}

impl Default for AutoencoderConfig {
    fn default() -> AutoencoderConfig {
        AutoencoderConfig {
            name: "ae".to_owned(),
            dims: Vec::new(),
            activations: vec![Activation::Sigmoid],
            encoding_activations: None,
            decoding_activations: None,
            epochs: Vec::new(),
            noise: NoiseSpec::None,
            loss: LossKind::Rmse,
            learning_rate: 0.01f32,
            solver: SolverConfig::default(),
            weight_filler: FillerType::Glorot,
            bias_filler: FillerType::Constant { value: 0f32 },
            seed: None,
            metadata: false,
            timeline: false,
            output_folder: None,
        }
    }
}

impl AutoencoderConfig {
    /// Create a config with the given layer widths and steps per layer.
    pub fn new(dims: Vec<usize>, epochs: Vec<usize>) -> AutoencoderConfig {
        AutoencoderConfig {
            dims: dims,
            epochs: epochs,
            ..AutoencoderConfig::default()
        }
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(text: &str) -> Result<AutoencoderConfig> {
        let config: AutoencoderConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every hyperparameter, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.dims.is_empty() {
            return Err(Error::InvalidConfig("dims must name at least one layer".to_owned()));
        }
        if let Some(width) = self.dims.iter().find(|width| **width == 0) {
            return Err(Error::InvalidConfig(format!("layer width must be at least 1, got {}", width)));
        }
        if self.epochs.len() != self.dims.len() {
            return Err(Error::InvalidConfig(format!("{} layers need {} epoch entries, got {}",
                                                    self.dims.len(),
                                                    self.dims.len(),
                                                    self.epochs.len())));
        }
        if self.epochs.iter().any(|epochs| *epochs == 0) {
            return Err(Error::InvalidConfig("every layer needs at least one epoch".to_owned()));
        }
        self.encoding_activations()?;
        self.decoding_activations()?;
        if !(self.learning_rate.is_finite() && self.learning_rate > 0f32) {
            return Err(Error::InvalidConfig(format!("learning rate must be positive, got {}", self.learning_rate)));
        }
        self.noise.check()?;
        self.solver_config().validate()?;
        self.weight_filler.validate()?;
        self.bias_filler.validate()?;
        if self.timeline && self.output_folder.is_none() {
            return Err(Error::InvalidConfig("timeline capture needs an output folder".to_owned()));
        }
        Ok(())
    }

    /// Encoding activation of every layer.
    pub fn encoding_activations(&self) -> Result<Vec<Activation>> {
        self.resolve("encoding", self.encoding_activations.as_ref())
    }

    /// Decoding activation of every layer.
    pub fn decoding_activations(&self) -> Result<Vec<Activation>> {
        self.resolve("decoding", self.decoding_activations.as_ref())
    }

    /// The solver configuration with the learning rate of this config as base rate.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            base_lr: self.learning_rate,
            ..self.solver.clone()
        }
    }

    /// The output folder, if one is configured.
    pub fn output(&self) -> Option<OutputFolder> {
        self.output_folder.as_ref().map(OutputFolder::new)
    }

    fn resolve(&self, role: &str, specific: Option<&Vec<Activation>>) -> Result<Vec<Activation>> {
        let activations = specific.unwrap_or(&self.activations);
        match activations.len() {
            1 => Ok(vec![activations[0]; self.dims.len()]),
            n if n == self.dims.len() => Ok(activations.clone()),
            n => Err(Error::InvalidConfig(format!("{} layers need 1 or {} {} activations, got {}",
                                                  self.dims.len(),
                                                  self.dims.len(),
                                                  role,
                                                  n))),
        }
    }
}
