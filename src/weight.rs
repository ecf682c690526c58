//! Provides configuration of weights and their initialization.
use ndarray::ArrayViewMutD;
use ndarray_rand::rand_distr::{Distribution, StandardNormal, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Enum for specifing the type of Filler.
pub enum FillerType {
    /// Fills the weight blob with a constant `value` (all values are the same).
    Constant {
        /// The value that will be used to fill the blob.
        value: f32,
    },
    /// Fills the weight blobs based on the paper:
    ///
    /// `[Bengio and Glorot 2010]: Understanding the difficulty of training deep feedforward neural networks.`
    ///
    /// Also known as Xavier filler. The fan-in and fan-out are taken from the blob that
    /// is being filled.
    Glorot,
    /// Fills the weight blob with zero-mean gaussian noise of deviation `std`.
    Gaussian {
        /// The standard deviation of the samples.
        std: f32,
    },
}

impl FillerType {
    /// Checks that the filler parameters are usable.
    pub fn validate(&self) -> Result<()> {
        match *self {
            FillerType::Constant { value } if !value.is_finite() => {
                Err(Error::InvalidConfig(format!("constant filler value {} is not finite", value)))
            }
            FillerType::Gaussian { std } if !(std.is_finite() && std >= 0f32) => {
                Err(Error::InvalidConfig(format!("gaussian filler deviation {} is invalid", std)))
            }
            _ => Ok(()),
        }
    }

    /// Uses a filler as specified by this FillerType to fill the values of `weight`.
    ///
    /// This filling of weights is usually done directly after creation of the weight blob.
    pub fn fill<R: Rng + ?Sized>(&self, weight: &mut ArrayViewMutD<f32>, rng: &mut R) {
        let (num_inputs, num_outputs) = Self::fans(weight);
        match *self {
            FillerType::Constant { value } => Self::fill_constant(weight, value),
            FillerType::Glorot => Self::fill_glorot(weight, num_inputs, num_outputs, rng),
            FillerType::Gaussian { std } => Self::fill_gaussian(weight, std, rng),
        }
    }

    /// Directly use the [Constant Filler](#variant.Constant).
    pub fn fill_constant(weight: &mut ArrayViewMutD<f32>, value: f32) {
        weight.fill(value);
    }

    /// Directly use the [Glorot Filler](#variant.Glorot).
    pub fn fill_glorot<R: Rng + ?Sized>(weight: &mut ArrayViewMutD<f32>, num_inputs: usize, num_outputs: usize, rng: &mut R) {
        let init_range = (6.0f32 / (num_inputs as f32 + num_outputs as f32)).sqrt();

        let between = Uniform::new_inclusive(-init_range, init_range);
        for e in weight.iter_mut() {
            *e = between.sample(rng);
        }
    }

    /// Directly use the [Gaussian Filler](#variant.Gaussian).
    pub fn fill_gaussian<R: Rng + ?Sized>(weight: &mut ArrayViewMutD<f32>, std: f32, rng: &mut R) {
        for e in weight.iter_mut() {
            let sample: f32 = StandardNormal.sample(rng);
            *e = sample * std;
        }
    }

    // Vectors count as a single fan on both sides.
    fn fans(weight: &ArrayViewMutD<f32>) -> (usize, usize) {
        let shape = weight.shape();
        match shape.len() {
            0 => (1, 1),
            1 => (shape[0], shape[0]),
            _ => (shape[0], shape[1..].iter().product()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn glorot_stays_within_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut weight = Array2::<f32>::zeros((10, 6));
        FillerType::Glorot.fill(&mut weight.view_mut().into_dyn(), &mut rng);

        let range = (6.0f32 / 16.0).sqrt();
        assert!(weight.iter().all(|w| w.abs() <= range));
        assert!(weight.iter().any(|w| *w != 0f32));
    }

    #[test]
    fn constant_fills_every_value() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut weight = Array2::<f32>::zeros((3, 2));
        FillerType::Constant { value: 0.5 }.fill(&mut weight.view_mut().into_dyn(), &mut rng);
        assert!(weight.iter().all(|w| *w == 0.5));
    }

    #[test]
    fn rejects_negative_deviation() {
        assert!(FillerType::Gaussian { std: -1.0 }.validate().is_err());
        assert!(FillerType::Glorot.validate().is_ok());
    }
}
