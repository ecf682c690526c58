//! Provides the tied-weight autoencoder Layer.
//!
//! A Layer maps its input of width `input_dim` to a hidden representation of width
//! `hidden_dim` and back:
//!
//! ```text
//! encoded = f(x * W + b)
//! decoded = g(encoded * W^T + c)
//! ```
//!
//! `W` are the encode weights, `b` the encode biases, `c` the decode biases, `f` and `g`
//! the encoding and decoding [activations][activation]. The decoder has no weight matrix of
//! its own, it always uses the transpose of `W` (tied weights), so an update of the encode
//! weights is an update of the decoder as well.
//!
//! The learnable weights of a Layer are, in this order, `encode_weights`,
//! `encode_biases` and `decode_biases`. [Solvers][solvers] and checkpoints address them
//! by that index and by [learnable_weights_names](struct.Layer.html#method.learnable_weights_names).
//!
//! [activation]: ../layers/activation/index.html
//! [solvers]: ../solvers/index.html
use ndarray::{Array1, Array2, ArrayD, ArrayView2, ArrayViewD, ArrayViewMutD, Ix1, Ix2};
use rand::Rng;

use crate::error::{Error, Result};
use crate::layers::{Activation, ActivationFn, Linear};
use crate::weight::FillerType;

/// Names of the learnable weights, in the order solvers see them.
pub const LEARNABLE_WEIGHTS: [&str; 3] = ["encode_weights", "encode_biases", "decode_biases"];

#[derive(Debug, Clone)]
/// One denoising autoencoder layer of a stack.
pub struct Layer {
    index: usize,
    input_dim: usize,
    hidden_dim: usize,

    encoding: Activation,
    decoding: Activation,

    encode_weights: Array2<f32>,
    encode_biases: Array1<f32>,
    decode_biases: Array1<f32>,

    /// Number of weight updates applied so far.
    steps: usize,
}

#[derive(Debug, Clone)]
/// Intermediate results of one forward pass, kept for the backward pass.
pub struct Forward {
    /// `x * W + b`
    pub encoded_linear: Array2<f32>,
    /// Encoding activation applied to `encoded_linear`.
    pub encoded: Array2<f32>,
    /// `encoded * W^T + c`
    pub decoded_linear: Array2<f32>,
    /// Decoding activation applied to `decoded_linear`, the reconstruction.
    pub decoded: Array2<f32>,
}

#[derive(Debug, Clone)]
/// Gradients of the loss w.r.t. the learnable weights of a [Layer](./struct.Layer.html).
///
/// Solvers transform these in place into the values that get subtracted from the
/// weights.
pub struct LayerGradients {
    /// Gradient w.r.t. the encode weights, the sum of encoder and decoder contribution.
    pub encode_weights: Array2<f32>,
    /// Gradient w.r.t. the encode biases.
    pub encode_biases: Array1<f32>,
    /// Gradient w.r.t. the decode biases.
    pub decode_biases: Array1<f32>,
}

impl LayerGradients {
    /// Views of all gradients, in learnable weight order.
    pub fn blobs(&self) -> Vec<ArrayViewD<f32>> {
        vec![self.encode_weights.view().into_dyn(),
             self.encode_biases.view().into_dyn(),
             self.decode_biases.view().into_dyn()]
    }

    /// Mutable views of all gradients, in learnable weight order.
    pub fn blobs_mut(&mut self) -> Vec<ArrayViewMutD<f32>> {
        vec![self.encode_weights.view_mut().into_dyn(),
             self.encode_biases.view_mut().into_dyn(),
             self.decode_biases.view_mut().into_dyn()]
    }

    /// The [L2 norm][1] over all gradients together.
    /// [1]: https://en.wikipedia.org/wiki/Norm_(mathematics)#Euclidean_norm
    pub fn l2_norm(&self) -> f32 {
        self.blobs()
            .iter()
            .map(|blob| blob.iter().map(|x| x * x).sum::<f32>())
            .sum::<f32>()
            .sqrt()
    }
}

impl Layer {
    /// Create the layer at position `index` of a stack, filling its weights and biases.
    pub fn new<R: Rng + ?Sized>(index: usize,
                                input_dim: usize,
                                hidden_dim: usize,
                                encoding: Activation,
                                decoding: Activation,
                                weight_filler: &FillerType,
                                bias_filler: &FillerType,
                                rng: &mut R)
                                -> Layer {
        let mut encode_weights = Array2::<f32>::zeros((input_dim, hidden_dim));
        let mut encode_biases = Array1::<f32>::zeros(hidden_dim);
        let mut decode_biases = Array1::<f32>::zeros(input_dim);
        weight_filler.fill(&mut encode_weights.view_mut().into_dyn(), rng);
        bias_filler.fill(&mut encode_biases.view_mut().into_dyn(), rng);
        bias_filler.fill(&mut decode_biases.view_mut().into_dyn(), rng);

        Layer {
            index: index,
            input_dim: input_dim,
            hidden_dim: hidden_dim,
            encoding: encoding,
            decoding: decoding,
            encode_weights: encode_weights,
            encode_biases: encode_biases,
            decode_biases: decode_biases,
            steps: 0,
        }
    }

    /// Position of the layer in its stack.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Width of the input the layer was created for.
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Width of the encoding.
    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// Number of weight updates applied so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Encoding activation.
    pub fn encoding(&self) -> Activation {
        self.encoding
    }

    /// Decoding activation.
    pub fn decoding(&self) -> Activation {
        self.decoding
    }

    /// `[input_dim × hidden_dim]`
    pub fn encode_weights(&self) -> &Array2<f32> {
        &self.encode_weights
    }

    /// `[hidden_dim]`
    pub fn encode_biases(&self) -> &Array1<f32> {
        &self.encode_biases
    }

    /// `[input_dim]`
    pub fn decode_biases(&self) -> &Array1<f32> {
        &self.decode_biases
    }

    /// The decoder weights, always the transpose of the encode weights.
    pub fn decode_weights(&self) -> ArrayView2<f32> {
        self.encode_weights.t()
    }

    /// Encode a batch of shape `[N × input_dim]` into `[N × hidden_dim]`.
    pub fn encode(&self, input: &Array2<f32>) -> Result<Array2<f32>> {
        self.check_input(input)?;
        let linear = Linear.compute_output(input, self.encode_weights.view(), self.encode_biases.view());
        Ok(self.encoding.compute_output(&linear))
    }

    /// Decode an encoding of shape `[N × hidden_dim]` back into `[N × input_dim]`.
    pub fn decode(&self, encoded: &Array2<f32>) -> Result<Array2<f32>> {
        if encoded.ncols() != self.hidden_dim {
            return Err(Error::ShapeMismatch { expected: self.hidden_dim, actual: encoded.ncols() });
        }
        let linear = Linear.compute_output(encoded, self.decode_weights(), self.decode_biases.view());
        Ok(self.decoding.compute_output(&linear))
    }

    /// Encode and decode `input`, keeping every intermediate result.
    pub fn forward(&self, input: &Array2<f32>) -> Result<Forward> {
        self.check_input(input)?;
        let encoded_linear = Linear.compute_output(input, self.encode_weights.view(), self.encode_biases.view());
        let encoded = self.encoding.compute_output(&encoded_linear);
        let decoded_linear = Linear.compute_output(&encoded, self.decode_weights(), self.decode_biases.view());
        let decoded = self.decoding.compute_output(&decoded_linear);

        Ok(Forward {
            encoded_linear: encoded_linear,
            encoded: encoded,
            decoded_linear: decoded_linear,
            decoded: decoded,
        })
    }

    /// Back-propagate `output_gradient` (w.r.t. the reconstruction) through decoder and encoder.
    ///
    /// `input` and `forward` must belong to the same forward pass.
    pub fn backward(&self, input: &Array2<f32>, forward: &Forward, output_gradient: &Array2<f32>) -> LayerGradients {
        let decoded_gradient = self.decoding.compute_input_gradient(&forward.decoded_linear,
                                                                    &forward.decoded,
                                                                    output_gradient);
        let encoded_output_gradient = Linear.compute_input_gradient(self.decode_weights(), &decoded_gradient);
        let encoded_gradient = self.encoding.compute_input_gradient(&forward.encoded_linear,
                                                                    &forward.encoded,
                                                                    &encoded_output_gradient);

        let (encoder_weights, encode_biases) = Linear.compute_parameters_gradient(input, &encoded_gradient);
        // the decoder contribution is w.r.t. W^T: [hidden_dim × input_dim]
        let (decoder_weights, decode_biases) = Linear.compute_parameters_gradient(&forward.encoded, &decoded_gradient);

        LayerGradients {
            encode_weights: encoder_weights + &decoder_weights.t(),
            encode_biases: encode_biases,
            decode_biases: decode_biases,
        }
    }

    /// Subtract the update values computed by a solver from the learnable weights.
    pub fn update_weights(&mut self, updates: &LayerGradients) {
        self.encode_weights -= &updates.encode_weights;
        self.encode_biases -= &updates.encode_biases;
        self.decode_biases -= &updates.decode_biases;
        self.steps += 1;
    }

    /// Names of the learnable weights, see [LEARNABLE_WEIGHTS](./constant.LEARNABLE_WEIGHTS.html).
    pub fn learnable_weights_names(&self) -> &'static [&'static str] {
        &LEARNABLE_WEIGHTS
    }

    /// Views of the learnable weights, in learnable weight order.
    pub fn learnable_weights(&self) -> Vec<ArrayViewD<f32>> {
        vec![self.encode_weights.view().into_dyn(),
             self.encode_biases.view().into_dyn(),
             self.decode_biases.view().into_dyn()]
    }

    /// Weight decay multipliers of the learnable weights. Biases are not regularized.
    pub fn weights_weight_decay(&self) -> [Option<f32>; 3] {
        [Some(1f32), None, None]
    }

    /// Learning rate multipliers of the learnable weights.
    pub fn weights_lr(&self) -> [f32; 3] {
        [1f32, 1f32, 1f32]
    }

    /// Replace the learnable weight called `name` with `value`.
    ///
    /// The shape of `value` has to match the current shape exactly.
    pub fn set_learnable_weight(&mut self, name: &str, value: ArrayD<f32>) -> Result<()> {
        let expected = match name {
            "encode_weights" => self.encode_weights.shape().to_vec(),
            "encode_biases" => self.encode_biases.shape().to_vec(),
            "decode_biases" => self.decode_biases.shape().to_vec(),
            _ => return Err(Error::Checkpoint(format!("layer {} has no weight called {}", self.index, name))),
        };
        if value.shape() != expected.as_slice() {
            return Err(Error::Checkpoint(format!("layer {} {}: expected shape {:?}, got {:?}",
                                                 self.index,
                                                 name,
                                                 expected,
                                                 value.shape())));
        }
        match name {
            "encode_weights" => self.encode_weights = value.into_dimensionality::<Ix2>()?,
            "encode_biases" => self.encode_biases = value.into_dimensionality::<Ix1>()?,
            _ => self.decode_biases = value.into_dimensionality::<Ix1>()?,
        }
        Ok(())
    }

    fn check_input(&self, input: &Array2<f32>) -> Result<()> {
        if input.ncols() != self.input_dim {
            return Err(Error::ShapeMismatch { expected: self.input_dim, actual: input.ncols() });
        }
        Ok(())
    }
}
