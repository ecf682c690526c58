//! Corrupts an input batch for denoising training.
//!
//! A denoising autoencoder layer is trained to reconstruct the clean batch from a
//! corrupted copy of it. The corruption is described by a [NoiseSpec][1], which has a
//! textual form so it can be given in a configuration file:
//!
//! - `"none"`: the batch is used as is.
//! - `"gaussian"`: independent zero-mean noise with standard deviation `0.2` is added to
//!   every element.
//! - `"mask-<frac>"`: for every row `round(frac * width)` distinct columns are picked
//!   uniformly at random and set to zero. Rows are masked independently.
//!
//! [1]: ./enum.NoiseSpec.html
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Standard deviation of the additive gaussian noise.
pub const GAUSSIAN_STDDEV: f32 = 0.2;

const MASK_PREFIX: &str = "mask-";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// The corruption applied to the input of a layer before training it.
pub enum NoiseSpec {
    /// No corruption.
    None,
    /// Additive gaussian noise with standard deviation [GAUSSIAN_STDDEV](./constant.GAUSSIAN_STDDEV.html).
    Gaussian,
    /// Zero the given fraction of every row. The fraction is in `[0, 1]`.
    Mask(f64),
}

impl NoiseSpec {
    /// Reports whether `text` is an acceptable textual noise spec.
    pub fn validate(text: &str) -> bool {
        text.parse::<NoiseSpec>().is_ok()
    }

    /// Checks that a mask fraction lies in `[0, 1]`.
    pub fn check(&self) -> Result<(), Error> {
        match *self {
            NoiseSpec::Mask(fraction) if !(0f64..=1f64).contains(&fraction) => {
                Err(Error::InvalidNoise(self.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Returns a corrupted copy of `batch`.
    pub fn corrupt<R: Rng + ?Sized>(&self, batch: &Array2<f32>, rng: &mut R) -> Array2<f32> {
        match *self {
            NoiseSpec::None => batch.clone(),
            NoiseSpec::Gaussian => {
                let noise: Array2<f32> = Array2::random_using(batch.raw_dim(), StandardNormal, rng);
                batch + &(noise * GAUSSIAN_STDDEV)
            }
            NoiseSpec::Mask(fraction) => {
                let mut corrupted = batch.clone();
                let width = corrupted.ncols();
                let amount = Self::masked_columns(fraction, width);
                if amount == 0 {
                    return corrupted;
                }
                for mut row in corrupted.rows_mut() {
                    for column in index::sample(rng, width, amount).iter() {
                        row[column] = 0f32;
                    }
                }
                corrupted
            }
        }
    }

    /// Number of columns zeroed per row for a mask of `fraction` over `width` columns.
    pub fn masked_columns(fraction: f64, width: usize) -> usize {
        let amount = (fraction * width as f64).round() as usize;
        amount.min(width)
    }
}

impl Default for NoiseSpec {
    fn default() -> NoiseSpec {
        NoiseSpec::None
    }
}

impl FromStr for NoiseSpec {
    type Err = Error;

    fn from_str(text: &str) -> Result<NoiseSpec, Error> {
        let spec = match text {
            "none" => NoiseSpec::None,
            "gaussian" => NoiseSpec::Gaussian,
            _ if text.starts_with(MASK_PREFIX) => {
                let fraction = text[MASK_PREFIX.len()..]
                    .parse::<f64>()
                    .map_err(|_| Error::InvalidNoise(text.to_owned()))?;
                NoiseSpec::Mask(fraction)
            }
            _ => return Err(Error::InvalidNoise(text.to_owned())),
        };
        spec.check()?;
        Ok(spec)
    }
}

impl TryFrom<String> for NoiseSpec {
    type Error = Error;

    fn try_from(text: String) -> Result<NoiseSpec, Error> {
        text.parse()
    }
}

impl From<NoiseSpec> for String {
    fn from(spec: NoiseSpec) -> String {
        spec.to_string()
    }
}

impl fmt::Display for NoiseSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            NoiseSpec::None => f.write_str("none"),
            NoiseSpec::Gaussian => f.write_str("gaussian"),
            NoiseSpec::Mask(fraction) => write!(f, "{}{}", MASK_PREFIX, fraction),
        }
    }
}
