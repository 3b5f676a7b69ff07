//! Shared test utilities for the luma-source test suite.
//!
//! Provides synthetic image builders with predictable pixel values and
//! comparison helpers that work with any [`LuminanceSource`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let buffer = numbered_buffer(4, 3);   // value at (x, y) = y * 4 + x
//! let view = buffer.window(1, 1, 2, 2).unwrap();
//! assert_pixels_match(&view, |x, y| buffer.get(x + 1, y + 1).unwrap());
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::luminance::{LuminanceBuffer, LuminanceSource};
use image::{GrayImage, Luma, Rgba, RgbaImage};

// =========================================================================
// Synthetic buffers and images
// =========================================================================

/// Packed buffer whose value at `(x, y)` is `(y * width + x) % 256`.
pub fn numbered_buffer(width: usize, height: usize) -> LuminanceBuffer {
    let data = (0..width * height).map(|i| (i % 256) as u8).collect();
    LuminanceBuffer::new(width, height, data).unwrap()
}

/// Grayscale image with a diagonal ramp, so every row and column differs.
pub fn gray_ramp(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 31) % 256) as u8]))
}

/// RGBA image mixing colors and alpha levels, including fully transparent
/// and fully opaque pixels.
pub fn rgba8_image(width: u32, height: u32) -> RgbaImage {
    const ALPHAS: [u8; 4] = [0, 0x40, 0xC0, 0xFF];
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            ((x * 37) % 256) as u8,
            ((y * 53) % 256) as u8,
            ((x * y * 11) % 256) as u8,
            ALPHAS[((x + y) % 4) as usize],
        ])
    })
}

/// Write `image` as PNG inside a fresh temp directory.
pub fn write_png(image: &RgbaImage, name: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    image.save(&path).unwrap();
    (tmp, path)
}

/// Decode a grayscale PNG written by the pipeline.
pub fn read_gray_png(path: &Path) -> GrayImage {
    image::open(path).unwrap().into_luma8()
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert every visible pixel of `source` equals `expected(x, y)`.
pub fn assert_pixels_match(source: &dyn LuminanceSource, expected: impl Fn(usize, usize) -> u8) {
    for y in 0..source.height() {
        for x in 0..source.width() {
            assert_eq!(
                source.luminance(x, y),
                Some(expected(x, y)),
                "pixel ({x}, {y}) mismatch"
            );
        }
    }
}
