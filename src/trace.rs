//! Provides the per-step training records and their timeline export.
//!
//! With metadata capture enabled every training step of a layer is recorded as a
//! [StepRecord][1]. With timeline capture enabled as well, the records of each layer are
//! written after its training as a [Chrome trace event][2] file, which can be opened in
//! `chrome://tracing` or Perfetto.
//!
//! [1]: ./struct.StepRecord.html
//! [2]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU
use std::path::PathBuf;
use std::time::Duration;

use serde_json::{json, Value};

use crate::error::Result;
use crate::util::{write_json, OutputFolder};

/// Subfolder of the output folder the timelines are written to.
pub const TIMELINE_FOLDER: &str = "timelines";

#[derive(Debug, Clone, PartialEq)]
/// Metadata of a single training step.
pub struct StepRecord {
    /// Index of the trained layer.
    pub layer: usize,
    /// `fit` call the step belongs to, starting at 1.
    pub iteration: usize,
    /// Step within the layer's training, starting at 0.
    pub step: usize,
    /// Reconstruction loss before the update of this step.
    pub loss: f32,
    /// Start of the step, relative to the start of the layer's training.
    pub offset: Duration,
    /// Wall time of the step.
    pub duration: Duration,
}

/// Build the trace event document for `records`.
pub fn timeline(name: &str, records: &[StepRecord]) -> Value {
    let events: Vec<Value> = records.iter()
                                    .map(|record| {
                                        json!({
                                            "name": format!("step {}", record.step),
                                            "cat": "train",
                                            "ph": "X",
                                            "pid": name,
                                            "tid": record.layer,
                                            "ts": record.offset.as_micros() as u64,
                                            "dur": record.duration.as_micros() as u64,
                                            "args": {
                                                "iteration": record.iteration,
                                                "loss": record.loss,
                                            },
                                        })
                                    })
                                    .collect();

    json!({
        "traceEvents": events,
        "displayTimeUnit": "ms",
    })
}

/// Write the timeline of one layer's training to
/// `<output>/timelines/<name>_layer_<layer>_iteration_<iteration>.json`.
pub fn write_timeline(output: &OutputFolder,
                      name: &str,
                      layer: usize,
                      iteration: usize,
                      records: &[StepRecord])
                      -> Result<PathBuf> {
    let folder = output.get_output_folder(TIMELINE_FOLDER)?;
    let path = folder.join(format!("{}_layer_{}_iteration_{}.json", name, layer, iteration));
    write_json(&path, &timeline(name, records))?;
    debug!("Wrote timeline of {} layer {} to {}", name, layer, path.display());
    Ok(path)
}
