//! Provides common utility functions
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Root directory for everything a model writes to disk.
///
/// Artifacts are grouped by kind into subfolders, e.g. `checkpoints` and `timelines`.
pub struct OutputFolder {
    root: PathBuf,
}

impl OutputFolder {
    /// Use `root` as output folder. Nothing is created until an artifact is written.
    pub fn new<P: Into<PathBuf>>(root: P) -> OutputFolder {
        OutputFolder { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the subfolder for artifacts of `kind`, creating it if necessary.
    pub fn get_output_folder(&self, kind: &str) -> Result<PathBuf> {
        let folder = self.root.join(kind);
        fs::create_dir_all(&folder)?;
        Ok(folder)
    }
}

/// Fail with a [ShapeMismatch](../error/enum.Error.html#variant.ShapeMismatch) unless
/// `batch` has `expected` columns.
pub fn check_columns(expected: usize, batch: &Array2<f32>) -> Result<()> {
    if batch.ncols() != expected {
        return Err(Error::ShapeMismatch { expected: expected, actual: batch.ncols() });
    }
    Ok(())
}

/// Serialize `value` as pretty printed JSON into a new file at `path`.
///
/// Only returns once the whole document reached the file.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Deserialize the JSON file at `path`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
