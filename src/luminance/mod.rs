//! Luminance extraction and transforms. Pure Rust, no I/O.
//!
//! | Operation | Type / function | Allocates? |
//! |---|---|---|
//! | **Extract** | [`extract`], [`extract_layout`] | one `width*height` buffer |
//! | **Crop** | [`LuminanceBuffer::window`], [`LuminanceSource::crop`] | no (shared view) |
//! | **Invert** | [`InvertedLuminanceSource`] | no (lazy decorator) |
//! | **Rotate 90° CCW** | [`LuminanceBuffer::rotated_counter_clockwise`] | fresh packed buffer |
//! | **Rotate 45°** | [`LuminanceSource::rotate_counter_clockwise_45`] | always `Unsupported` |
//!
//! The module is split into:
//! - **Geometry**: [`Rect`] and window composition (unit testable)
//! - **Source**: [`LuminanceSource`] trait + [`LuminanceError`]
//! - **Buffer**: [`LuminanceBuffer`], the owned/viewed storage
//! - **Invert**: [`InvertedLuminanceSource`] decorator
//! - **Extract**: pixel-format strategies producing buffers

pub mod buffer;
pub mod extract;
mod geometry;
pub mod invert;
pub mod source;

pub use buffer::LuminanceBuffer;
pub use extract::{
    ExtractedImage, PixelFormat, PixelLayout, Rgba16Image, composite_luma, extract,
    extract_layout, extract_layout_full, widen,
};
pub use geometry::{Rect, compose_window};
pub use invert::InvertedLuminanceSource;
pub use source::{LuminanceError, LuminanceSource, SharedSource, mean_luminance};
