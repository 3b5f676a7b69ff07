//! Owned luminance storage with crop views and 90° rotation.
//!
//! A [`LuminanceBuffer`] is an `Arc<[u8]>` plus geometry:
//!
//! ```text
//!          data_width
//!   ┌──────────────────────┐
//!   │      top             │
//!   │    ┌────────┐        │ data_height
//!   │left│ window │ height │
//!   │    └────────┘        │
//!   │      width           │
//!   └──────────────────────┘
//! ```
//!
//! Cropping clones the `Arc` and records a smaller window, so a view never
//! copies pixels and keeps the storage alive for as long as it lives.
//! Rotation allocates fresh, tightly packed storage because it changes which
//! axis is contiguous. There is no write path into the storage once it is
//! built.

use super::geometry::{Rect, compose_window};
use super::invert::InvertedLuminanceSource;
use super::source::{LuminanceError, LuminanceSource, SharedSource};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct LuminanceBuffer {
    luminances: Arc<[u8]>,
    data_width: usize,
    data_height: usize,
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

impl LuminanceBuffer {
    /// Take ownership of row-major luminance bytes for a `width × height` image.
    ///
    /// Extra trailing bytes are kept but never read.
    pub fn new(width: usize, height: usize, luminances: Vec<u8>) -> Result<Self, LuminanceError> {
        let expected = Rect::full(width, height)
            .area()
            .ok_or(LuminanceError::DimensionsOverflow { width, height })?;
        if luminances.len() < expected {
            return Err(LuminanceError::BufferTooSmall {
                expected,
                actual: luminances.len(),
            });
        }
        Ok(Self::packed(width, height, luminances))
    }

    /// Storage the caller guarantees holds at least `width * height` bytes.
    pub(crate) fn packed(width: usize, height: usize, luminances: Vec<u8>) -> Self {
        debug_assert!(
            Rect::full(width, height)
                .area()
                .is_some_and(|area| luminances.len() >= area)
        );
        Self {
            luminances: Arc::from(luminances),
            data_width: width,
            data_height: height,
            left: 0,
            top: 0,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row stride of the underlying storage.
    pub fn data_width(&self) -> usize {
        self.data_width
    }

    pub fn data_height(&self) -> usize {
        self.data_height
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn top(&self) -> usize {
        self.top
    }

    /// The visible window in storage coordinates.
    pub fn window_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// The whole underlying storage, including pixels outside the window.
    pub fn luminances(&self) -> &[u8] {
        &self.luminances
    }

    /// Whether both buffers read from the same allocation.
    pub fn shares_storage_with(&self, other: &LuminanceBuffer) -> bool {
        Arc::ptr_eq(&self.luminances, &other.luminances)
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (self.top + y) * self.data_width + self.left + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.luminances[self.offset(x, y)])
    }

    /// Borrow row `y` of the visible window straight from storage.
    pub fn row_slice(&self, y: usize) -> Option<&[u8]> {
        (y < self.height).then(|| {
            let start = self.offset(0, y);
            &self.luminances[start..start + self.width]
        })
    }

    /// Crop view sharing this buffer's storage.
    ///
    /// Coordinates are relative to the current window; offsets compose with
    /// any earlier crop.
    pub fn window(
        &self,
        left: usize,
        top: usize,
        width: usize,
        height: usize,
    ) -> Result<LuminanceBuffer, LuminanceError> {
        let rect = compose_window(self.window_rect(), Rect::new(left, top, width, height))?;
        tracing::trace!(?rect, "crop view");
        Ok(Self {
            luminances: Arc::clone(&self.luminances),
            data_width: self.data_width,
            data_height: self.data_height,
            left: rect.left,
            top: rect.top,
            width: rect.width,
            height: rect.height,
        })
    }

    /// Rotate the visible window 90° counter-clockwise into fresh storage.
    ///
    /// Column `width - 1` of the window becomes row 0 of the result. Pixels
    /// outside the window are dropped; the result has no offset and
    /// `data_width == self.height()`.
    pub fn rotated_counter_clockwise(&self) -> LuminanceBuffer {
        let (width, height) = (self.width, self.height);
        let mut rotated = vec![0u8; width * height];
        for j in 0..width {
            let x = self.left + width - 1 - j;
            let out = &mut rotated[j * height..(j + 1) * height];
            for (i, slot) in out.iter_mut().enumerate() {
                let y = self.top + i;
                *slot = self.luminances[y * self.data_width + x];
            }
        }
        tracing::trace!(width = height, height = width, "rotated counter-clockwise");
        Self::packed(height, width, rotated)
    }
}

impl fmt::Debug for LuminanceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LuminanceBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("left", &self.left)
            .field("top", &self.top)
            .field("data_width", &self.data_width)
            .field("data_height", &self.data_height)
            .field("storage_len", &self.luminances.len())
            .finish()
    }
}

impl LuminanceSource for LuminanceBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn luminance(&self, x: usize, y: usize) -> Option<u8> {
        self.get(x, y)
    }

    fn row<'a>(&self, y: usize, buf: &'a mut Vec<u8>) -> Result<&'a [u8], LuminanceError> {
        let row = self.row_slice(y).ok_or(LuminanceError::RowOutOfRange {
            y,
            height: self.height,
        })?;
        buf.clear();
        buf.extend_from_slice(row);
        Ok(&buf[..])
    }

    fn matrix(&self) -> Vec<u8> {
        let area = self.width * self.height;
        if self.left == 0 && self.top == 0 && self.width == self.data_width {
            return self.luminances[..area].to_vec();
        }
        let mut out = Vec::with_capacity(area);
        for y in 0..self.height {
            let start = self.offset(0, y);
            out.extend_from_slice(&self.luminances[start..start + self.width]);
        }
        out
    }

    fn is_crop_supported(&self) -> bool {
        true
    }

    fn crop(
        &self,
        left: usize,
        top: usize,
        width: usize,
        height: usize,
    ) -> Result<SharedSource, LuminanceError> {
        Ok(Arc::new(self.window(left, top, width, height)?))
    }

    fn invert(&self) -> SharedSource {
        InvertedLuminanceSource::wrap(Arc::new(self.clone()))
    }

    fn is_rotate_supported(&self) -> bool {
        true
    }

    fn rotate_counter_clockwise(&self) -> Result<SharedSource, LuminanceError> {
        Ok(Arc::new(self.rotated_counter_clockwise()))
    }
}
