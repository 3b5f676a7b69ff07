//! Lazy inversion decorator.

use super::source::{LuminanceError, LuminanceSource, SharedSource};
use std::sync::Arc;

/// Wraps another source and reports `255 - v` for every read.
///
/// Nothing is copied: the delegate stays shared and reads are transformed on
/// the fly. Inverting an inverted source hands back the original delegate.
#[derive(Debug, Clone)]
pub struct InvertedLuminanceSource {
    delegate: SharedSource,
}

impl InvertedLuminanceSource {
    pub fn new(delegate: SharedSource) -> Self {
        Self { delegate }
    }

    /// Wrap `delegate` and erase the type.
    pub fn wrap(delegate: SharedSource) -> SharedSource {
        Arc::new(Self::new(delegate))
    }

    pub fn delegate(&self) -> &SharedSource {
        &self.delegate
    }
}

impl LuminanceSource for InvertedLuminanceSource {
    fn width(&self) -> usize {
        self.delegate.width()
    }

    fn height(&self) -> usize {
        self.delegate.height()
    }

    fn luminance(&self, x: usize, y: usize) -> Option<u8> {
        self.delegate.luminance(x, y).map(|v| 255 - v)
    }

    fn row<'a>(&self, y: usize, buf: &'a mut Vec<u8>) -> Result<&'a [u8], LuminanceError> {
        let row = self.delegate.row(y, buf)?.len();
        for v in &mut buf[..row] {
            *v = 255 - *v;
        }
        Ok(&buf[..row])
    }

    fn matrix(&self) -> Vec<u8> {
        let mut matrix = self.delegate.matrix();
        for v in &mut matrix {
            *v = 255 - *v;
        }
        matrix
    }

    fn is_crop_supported(&self) -> bool {
        self.delegate.is_crop_supported()
    }

    fn crop(
        &self,
        left: usize,
        top: usize,
        width: usize,
        height: usize,
    ) -> Result<SharedSource, LuminanceError> {
        Ok(Self::wrap(self.delegate.crop(left, top, width, height)?))
    }

    fn invert(&self) -> SharedSource {
        Arc::clone(&self.delegate)
    }

    fn is_rotate_supported(&self) -> bool {
        self.delegate.is_rotate_supported()
    }

    fn rotate_counter_clockwise(&self) -> Result<SharedSource, LuminanceError> {
        Ok(Self::wrap(self.delegate.rotate_counter_clockwise()?))
    }

    fn rotate_counter_clockwise_45(&self) -> Result<SharedSource, LuminanceError> {
        Ok(Self::wrap(self.delegate.rotate_counter_clockwise_45()?))
    }
}
