//! Provides the on-disk format of a model's learnable weights.
//!
//! A checkpoint is a JSON document holding, for every layer `i`, the tensors
//! `layer{i}_encode_weights`, `layer{i}_encode_biases` and `layer{i}_decode_biases`.
//! It is written to `<output>/checkpoints/<name>_<iteration>.json`.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{read_json, write_json, OutputFolder};

/// Subfolder of the output folder the checkpoints are written to.
pub const CHECKPOINT_FOLDER: &str = "checkpoints";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A tensor in row-major order.
pub struct StoredTensor {
    /// Length of every dimension.
    pub shape: Vec<usize>,
    /// The values, row-major.
    pub data: Vec<f32>,
}

impl StoredTensor {
    /// Copy `tensor` into row-major storage.
    pub fn from_view(tensor: ArrayViewD<f32>) -> StoredTensor {
        StoredTensor {
            shape: tensor.shape().to_vec(),
            data: tensor.iter().cloned().collect(),
        }
    }

    /// Rebuild the tensor, failing if `data` does not fill `shape`.
    pub fn to_array(&self) -> Result<ArrayD<f32>> {
        Ok(ArrayD::from_shape_vec(IxDyn(&self.shape), self.data.clone())?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The learnable weights of a model at one iteration.
pub struct Checkpoint {
    /// Name of the model that was saved.
    pub name: String,
    /// Number of `fit` calls the model had seen.
    pub iteration: usize,
    /// Tensors by key, see [key](./fn.key.html).
    pub tensors: BTreeMap<String, StoredTensor>,
}

/// Key of the learnable weight `weight` of layer `layer`.
pub fn key(layer: usize, weight: &str) -> String {
    format!("layer{}_{}", layer, weight)
}

impl Checkpoint {
    /// Create an empty checkpoint.
    pub fn new(name: &str, iteration: usize) -> Checkpoint {
        Checkpoint {
            name: name.to_owned(),
            iteration: iteration,
            tensors: BTreeMap::new(),
        }
    }

    /// Store `tensor` as weight `weight` of layer `layer`.
    pub fn insert(&mut self, layer: usize, weight: &str, tensor: ArrayViewD<f32>) {
        self.tensors.insert(key(layer, weight), StoredTensor::from_view(tensor));
    }

    /// The tensor of weight `weight` of layer `layer`.
    pub fn tensor(&self, layer: usize, weight: &str) -> Result<ArrayD<f32>> {
        let key = key(layer, weight);
        self.tensors
            .get(&key)
            .ok_or_else(|| Error::Checkpoint(format!("checkpoint of {} has no tensor {}", self.name, key)))?
            .to_array()
    }

    /// Number of layers with an encode weight matrix in this checkpoint.
    pub fn depth(&self) -> usize {
        (0..).take_while(|layer| self.tensors.contains_key(&key(*layer, "encode_weights"))).count()
    }

    /// Path of the checkpoint file below `output`, creating the checkpoint folder.
    pub fn path(output: &OutputFolder, name: &str, iteration: usize) -> Result<PathBuf> {
        let folder = output.get_output_folder(CHECKPOINT_FOLDER)?;
        Ok(folder.join(format!("{}_{}.json", name, iteration)))
    }

    /// Write the checkpoint below `output` and return the path of the file.
    pub fn save(&self, output: &OutputFolder) -> Result<PathBuf> {
        let path = Self::path(output, &self.name, self.iteration)?;
        write_json(&path, self)?;
        Ok(path)
    }

    /// Read a checkpoint file.
    pub fn load(path: &Path) -> Result<Checkpoint> {
        read_json(path)
    }
}
