//! Lamina trains stacks of denoising autoencoders layer by layer and composes them into
//! a dataflow graph for hierarchical feature learning.
//!
//! ## Architecture
//!
//! A [StackedAutoencoder][autoencoder] is an ordered stack of [Layers][layer]. Every layer
//! encodes its input into a narrower (or wider) representation and is trained to decode
//! that representation back into its input. The decoder reuses the transpose of the
//! encoder's weights (tied weights). Training is greedy: each layer is trained on its
//! own, against a corrupted copy of its input, and the clean encoding of a trained layer
//! is the input of the layer on top of it.
//!
//! The building blocks of a layer live in [layers][layers]: [activations][activation],
//! the [linear projection][common], [losses][loss] and the [input corruption][utility].
//! The weight updates are computed by [Solvers][solvers], configured through a
//! [SolverConfig][solver].
//!
//! Autoencoders become vertices of a [graph][graph] by wrapping them into an
//! [AutoencoderNode][node]. A node registers for the output of other nodes or of an
//! [InputLayer][input]. Whenever it has received one batch from every producer it
//! registered for, it joins them, trains on the joined batch and emits its encoding to
//! its own subscribers. Everything runs synchronously on the caller's stack.
//!
//! ## Examples
//!
//! ```
//! # use ndarray::Array2;
//! # use lamina::{AutoencoderConfig, StackedAutoencoder};
//! let config = AutoencoderConfig {
//!     noise: "mask-0.25".parse().unwrap(),
//!     seed: Some(1),
//!     ..AutoencoderConfig::new(vec![8, 4], vec![5, 5])
//! };
//! let mut model = StackedAutoencoder::from_config(&config).unwrap();
//! let batch = Array2::from_elem((16, 12), 0.5f32);
//! let encoding = model.fit_transform(&batch).unwrap();
//! assert_eq!(&[16, 4], encoding.shape());
//! ```
//!
//! A complete hierarchy is shown in the `hierarchy` demo.
//!
//! [autoencoder]: ./autoencoder/index.html
//! [layer]: ./layer/index.html
//! [layers]: ./layers/index.html
//! [activation]: ./layers/activation/index.html
//! [common]: ./layers/common/index.html
//! [loss]: ./layers/loss/index.html
//! [utility]: ./layers/utility/index.html
//! [solvers]: ./solvers/index.html
//! [solver]: ./solver/struct.SolverConfig.html
//! [graph]: ./graph/index.html
//! [node]: ./graph/node/struct.AutoencoderNode.html
//! [input]: ./graph/input/struct.InputLayer.html
#![deny(unsafe_code)]
#![warn(missing_docs,
        missing_debug_implementations, missing_copy_implementations,
        trivial_casts, trivial_numeric_casts,
        unused_import_braces, unused_qualifications)]

#[macro_use]
extern crate log;

pub use crate::autoencoder::{Phase, StackedAutoencoder};
pub use crate::config::AutoencoderConfig;
pub use crate::error::{Error, Result};
pub use crate::graph::{AutoencoderNode, InputLayer, Producer, Receipt, Region, SourceId, TransformSubscriber};
pub use crate::util::OutputFolder;

pub mod autoencoder;
pub mod backend;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod graph;
pub mod layer;
pub mod layers;
pub mod solver;
pub mod solvers;
pub mod trace;
pub mod trainer;
pub mod util;
pub mod weight;
