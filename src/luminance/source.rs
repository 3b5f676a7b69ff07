//! The luminance source trait and shared error type.
//!
//! [`LuminanceSource`] is what a binarizer consumes: a rectangle of 8-bit
//! luminance values (0 = black, 255 = white) plus the geometric transforms it
//! may ask for. Transforms return [`SharedSource`] so views and decorators can
//! be chained and handed across threads without copying pixel storage.
//!
//! Implementations only need to provide dimensions, per-pixel reads and
//! [`invert`](LuminanceSource::invert). Crop and rotation default to
//! unsupported, and callers are expected to check the capability flags before
//! asking for them.

use super::geometry::Rect;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LuminanceError {
    #[error(
        "window {width}x{height} at ({left}, {top}) is outside the {bound_width}x{bound_height} source"
    )]
    OutOfBounds {
        left: i64,
        top: i64,
        width: i64,
        height: i64,
        bound_width: usize,
        bound_height: usize,
    },
    #[error("{0} is not supported by this luminance source")]
    Unsupported(&'static str),
    #[error("row {y} requested from a source of height {height}")]
    RowOutOfRange { y: usize, height: usize },
    #[error("luminance buffer holds {actual} bytes, {expected} required")]
    BufferTooSmall { expected: usize, actual: usize },
    #[error("{width}x{height} luminance buffer does not fit in memory")]
    DimensionsOverflow { width: usize, height: usize },
}

impl LuminanceError {
    pub(crate) fn out_of_bounds(request: Rect, bounds: Rect) -> Self {
        let signed = |v: usize| i64::try_from(v).unwrap_or(i64::MAX);
        Self::OutOfBounds {
            left: signed(request.left),
            top: signed(request.top),
            width: signed(request.width),
            height: signed(request.height),
            bound_width: bounds.width,
            bound_height: bounds.height,
        }
    }
}

/// Reference-counted handle to any luminance source.
pub type SharedSource = Arc<dyn LuminanceSource>;

/// A read-only rectangle of luminance values.
pub trait LuminanceSource: fmt::Debug + Send + Sync {
    /// Visible width in pixels.
    fn width(&self) -> usize;

    /// Visible height in pixels.
    fn height(&self) -> usize;

    /// Luminance at `(x, y)` of the visible window, `None` outside it.
    fn luminance(&self, x: usize, y: usize) -> Option<u8>;

    /// Fetch one row of the visible window into `buf`, resizing it to
    /// [`width`](Self::width), and return the filled slice.
    fn row<'a>(&self, y: usize, buf: &'a mut Vec<u8>) -> Result<&'a [u8], LuminanceError> {
        let height = self.height();
        if y >= height {
            return Err(LuminanceError::RowOutOfRange { y, height });
        }
        let width = self.width();
        buf.clear();
        buf.extend((0..width).map(|x| self.luminance(x, y).unwrap_or(0)));
        Ok(&buf[..width])
    }

    /// Row-major copy of the whole visible window (`width * height` bytes).
    fn matrix(&self) -> Vec<u8> {
        let (width, height) = (self.width(), self.height());
        let mut out = Vec::with_capacity(width * height);
        let mut row = Vec::with_capacity(width);
        for y in 0..height {
            if let Ok(r) = self.row(y, &mut row) {
                out.extend_from_slice(r);
            }
        }
        out
    }

    fn is_crop_supported(&self) -> bool {
        false
    }

    /// View of a sub-window, relative to the current visible window.
    fn crop(
        &self,
        _left: usize,
        _top: usize,
        _width: usize,
        _height: usize,
    ) -> Result<SharedSource, LuminanceError> {
        Err(LuminanceError::Unsupported("crop"))
    }

    /// Source whose reads return `255 - v`.
    fn invert(&self) -> SharedSource;

    fn is_rotate_supported(&self) -> bool {
        false
    }

    /// Rotate the visible window 90° counter-clockwise.
    fn rotate_counter_clockwise(&self) -> Result<SharedSource, LuminanceError> {
        Err(LuminanceError::Unsupported("rotate counter-clockwise"))
    }

    /// 45° rotation. No source in this crate implements it.
    fn rotate_counter_clockwise_45(&self) -> Result<SharedSource, LuminanceError> {
        Err(LuminanceError::Unsupported("rotate counter-clockwise 45°"))
    }
}

/// Arithmetic mean of every visible luminance value, `0.0` for empty sources.
pub fn mean_luminance(source: &dyn LuminanceSource) -> f64 {
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return 0.0;
    }
    let mut row = Vec::with_capacity(width);
    let mut total: u64 = 0;
    for y in 0..height {
        if let Ok(r) = source.row(y, &mut row) {
            total += r.iter().map(|&v| u64::from(v)).sum::<u64>();
        }
    }
    total as f64 / (width * height) as f64
}
