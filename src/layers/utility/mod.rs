//! Provides various helpful operations, which might be not directly related to
//! neural networks in general.
//!
//! These do not have to change what a layer can learn, they prepare the data that
//! flows into it. For now this is the input corruption used for denoising training.
pub use self::noise::NoiseSpec;

pub mod noise;
