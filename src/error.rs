//! Provides the error type shared by all modules.
//!
//! Construction errors are returned before a model exists. A refused registration on
//! the dataflow graph is logged and returned as well. Problems with delivered payloads
//! (an unknown producer, a slot that is still full) are only logged and reported as a
//! receipt, see [AutoencoderNode][1].
//!
//! [1]: ../graph/struct.AutoencoderNode.html
use std::io;

use thiserror::Error;

/// Errors produced while configuring, training, wiring or persisting autoencoders.
#[derive(Debug, Error)]
pub enum Error {
    /// A hyperparameter failed construction-time validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// An activation name outside of the supported set.
    #[error("unknown activation `{0}`, expected one of sigmoid, tanh, relu, linear, softmax")]
    UnknownActivation(String),
    /// A loss name outside of the supported set.
    #[error("unsupported loss `{0}`, expected `rmse` or `cross-entropy`")]
    UnsupportedLoss(String),
    /// A noise specification that is neither `none`, `gaussian` nor `mask-<frac>`.
    #[error("invalid noise `{0}`, expected `none`, `gaussian` or `mask-<frac>` with frac in [0, 1]")]
    InvalidNoise(String),
    /// Registration was attempted after the node started training.
    #[error("can't register `{node}` for new data, it has already been trained")]
    TopologyFrozen {
        /// Name of the node that refused the registration.
        node: String,
    },
    /// The node already holds a buffer slot for this producer.
    #[error("`{node}` is already registered for input from `{upstream}`")]
    AlreadyRegistered {
        /// Name of the receiving node.
        node: String,
        /// Name of the producer.
        upstream: String,
    },
    /// A node tried to subscribe to its own output.
    #[error("`{0}` can't register for its own output")]
    SelfRegistration(String),
    /// A column region that does not fit into the producer's width.
    #[error("region {start}..{end} does not fit into an input of width {width}")]
    InvalidRegion {
        /// First column of the region.
        start: usize,
        /// One past the last column of the region.
        end: usize,
        /// Width of the producing input.
        width: usize,
    },
    /// A batch whose feature count does not match what the receiver was built for.
    #[error("shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch {
        /// Expected number of columns.
        expected: usize,
        /// Number of columns received.
        actual: usize,
    },
    /// Failure reported by ndarray, e.g. while joining ragged batches.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    /// A checkpoint that can't be applied to the model.
    #[error("checkpoint error: {0}")]
    Checkpoint(String),
    /// Filesystem failure while writing or reading artifacts.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// (De)serialization failure of a configuration, checkpoint or trace.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = ::std::result::Result<T, Error>;
