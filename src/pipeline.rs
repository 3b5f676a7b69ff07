//! File pipeline: decode → extract → transform → write.
//!
//! The library core in [`luminance`](crate::luminance) never touches the
//! filesystem. This module is the thin outer layer the `luma` binary drives:
//!
//! ```text
//! input.jpg ──image::open──▶ DynamicImage ──extract──▶ LuminanceBuffer
//!                                                          │
//!                       crop → invert → rotate × n  ◀──────┘
//!                                                          │
//! luma-out/input-luma.png ◀──GrayImage::save───────────────┘
//! ```
//!
//! ## Parallel Processing
//!
//! Batches run on [rayon](https://docs.rs/rayon). Results come back in input
//! order; one bad file is reported and the rest still run.

use crate::config::TransformConfig;
use crate::luminance::{
    LuminanceError, PixelFormat, Rect, SharedSource, extract, mean_luminance,
};
use image::GrayImage;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Luminance error: {0}")]
    Luminance(#[from] LuminanceError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Transforms applied after extraction, always in the order crop, invert,
/// rotate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformPlan {
    pub crop: Option<Rect>,
    pub invert: bool,
    /// Counter-clockwise quarter turns; taken modulo 4.
    pub quarter_turns: u8,
}

impl TransformPlan {
    pub fn from_config(config: &TransformConfig) -> Self {
        Self {
            crop: config.crop_rect(),
            invert: config.invert,
            quarter_turns: config.rotate,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.crop.is_none() && !self.invert && self.quarter_turns % 4 == 0
    }

    /// Apply the plan to `source`.
    ///
    /// # Errors
    /// [`LuminanceError::OutOfBounds`] for a crop outside the source and
    /// [`LuminanceError::Unsupported`] when the source lacks a capability the
    /// plan needs.
    pub fn apply(&self, source: SharedSource) -> Result<SharedSource, LuminanceError> {
        let mut current = source;
        if let Some(rect) = self.crop {
            current = current.crop(rect.left, rect.top, rect.width, rect.height)?;
        }
        if self.invert {
            current = current.invert();
        }
        let turns = self.quarter_turns % 4;
        if turns > 0 && !current.is_rotate_supported() {
            return Err(LuminanceError::Unsupported("rotate counter-clockwise"));
        }
        for _ in 0..turns {
            current = current.rotate_counter_clockwise()?;
        }
        tracing::trace!(plan = ?self, width = current.width(), height = current.height(), "plan applied");
        Ok(current)
    }
}

/// Outcome of one processed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedImage {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: PixelFormat,
    /// Extracted image size before transforms (width, height).
    pub source_dimensions: (usize, usize),
    /// Written image size (width, height).
    pub dimensions: (usize, usize),
    pub mean_luminance: f64,
}

/// Progress notification emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Processed(ProcessedImage),
    Failed { source: PathBuf, error: String },
}

/// Output path for `input`: `<output_dir>/<stem>-luma.png`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    output_dir.join(format!("{stem}-luma.png"))
}

/// Decode `input`, extract luminance, apply `plan`, write a grayscale PNG.
pub fn process_file(
    input: &Path,
    output_dir: &Path,
    plan: &TransformPlan,
) -> Result<ProcessedImage, PipelineError> {
    let decoded = image::open(input)?;
    let extracted = extract(&decoded);
    let source_dimensions = (extracted.buffer.width(), extracted.buffer.height());
    let result = plan.apply(Arc::new(extracted.buffer))?;

    let (width, height) = (result.width(), result.height());
    let matrix = result.matrix();
    let actual = matrix.len();
    let gray = GrayImage::from_raw(width as u32, height as u32, matrix).ok_or(
        LuminanceError::BufferTooSmall {
            expected: width * height,
            actual,
        },
    )?;

    std::fs::create_dir_all(output_dir)?;
    let output = output_path_for(input, output_dir);
    gray.save(&output)?;
    tracing::debug!(source = %input.display(), output = %output.display(), "wrote luminance");

    Ok(ProcessedImage {
        source: input.to_path_buf(),
        output,
        format: extracted.format,
        source_dimensions,
        dimensions: (width, height),
        mean_luminance: mean_luminance(result.as_ref()),
    })
}

/// Process many files in parallel, returning results in input order.
pub fn process_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    plan: &TransformPlan,
    progress: Option<Sender<BatchEvent>>,
) -> Vec<Result<ProcessedImage, PipelineError>> {
    inputs
        .par_iter()
        .map_with(progress, |progress, input| {
            let result = process_file(input, output_dir, plan);
            let event = match &result {
                Ok(processed) => BatchEvent::Processed(processed.clone()),
                Err(e) => {
                    tracing::warn!(source = %input.display(), error = %e, "extraction failed");
                    BatchEvent::Failed {
                        source: input.clone(),
                        error: e.to_string(),
                    }
                }
            };
            if let Some(tx) = progress {
                // Receiver gone means nobody is listening; the result is still returned.
                let _ = tx.send(event);
            }
            result
        })
        .collect()
}

/// Write processed-image reports as pretty JSON.
pub fn write_report(path: &Path, reports: &[ProcessedImage]) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json)?;
    Ok(())
}
