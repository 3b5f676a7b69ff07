//! # luma-source
//!
//! Turns decoded raster images into single-channel luminance buffers, the
//! input stage of a barcode binarizer. The crate stops at producing correctly
//! valued bytes plus a handful of cheap geometric transforms over them; it
//! does not decode files, threshold pixels, or recognise symbols.
//!
//! # Architecture: Extract, Then View
//!
//! ```text
//! DynamicImage ──probe──▶ PixelLayout ──extract──▶ LuminanceBuffer (owns Arc<[u8]>)
//!                                                        │
//!                      crop ─▶ view sharing the same Arc ┤
//!                    invert ─▶ lazy 255 - v decorator    ┤
//!                    rotate ─▶ fresh packed buffer       ┘
//! ```
//!
//! Every transform returns a new source and leaves its input untouched, so
//! any number of views can be read concurrently without locks.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`luminance`] | The core: pixel extraction strategies, buffers, crop/invert/rotate |
//! | [`pipeline`] | File layer: decode, extract, transform, write PNG, batch with rayon |
//! | [`config`] | `luma.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Integer-Only Luma
//!
//! Colour pixels are reduced with `(R + 2G + B) * 255 / (4 * 0xFFFF)` on
//! 16-bit channels and composited over white using straight alpha. The
//! weights approximate Rec. 601 closely enough for binarization, need no
//! floating point, and are reproduced bit-for-bit, since downstream
//! thresholds are tuned against them.
//!
//! ## Closed Set of Pixel Layouts
//!
//! Extraction knows exactly three layouts: 8-bit gray, 16-bit RGBA and 8-bit
//! RGBA. The layout is probed once per image. Anything else is converted
//! explicitly by the `image` crate first, never reinterpreted in place.
//!
//! ## Views Over Copies
//!
//! Crop is a view: it clones an `Arc` and records a new window. Rotation is
//! the only transform that allocates, because it changes which axis is
//! contiguous. 45° rotation is a declared capability gap and always fails.

pub mod config;
pub mod luminance;
pub mod output;
pub mod pipeline;

pub use luminance::{
    InvertedLuminanceSource, LuminanceBuffer, LuminanceError, LuminanceSource, PixelFormat,
    Rect, SharedSource, extract,
};

#[cfg(test)]
pub(crate) mod test_helpers;
