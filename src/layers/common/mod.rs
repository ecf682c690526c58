//! Provides the building blocks shared by the encoder and the decoder.
//!
//! Both halves of a layer are an affine projection followed by an activation. The
//! projection lives here, the activations in [activation](../activation/index.html).
pub use self::linear::Linear;

pub mod linear;
