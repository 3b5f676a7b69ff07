//! Pixel extraction: image buffers → [`LuminanceBuffer`].
//!
//! ## Strategies
//!
//! | Layout | Strategy |
//! |---|---|
//! | `GrayImage` | row copy, no arithmetic |
//! | `Rgba<u16>` buffer | 16-bit channels straight into the blend |
//! | `RgbaImage` | 8-bit channels widened by bit replication, then the blend |
//!
//! The layout is probed once per image, never per pixel. Any other
//! [`DynamicImage`] layout is converted explicitly before extraction.
//!
//! ## Blend
//!
//! Luma weights green twice and red and blue once, on a 16-bit scale, then
//! composites with straight alpha over opaque white:
//!
//! ```text
//! lum  = (R + 2G + B) * 255 / (4 * 0xFFFF)
//! byte = (lum * A + (0xFFFF - A) * 255) / 0xFFFF
//! ```
//!
//! Integer division truncates at both steps. Binarizer thresholds downstream
//! are tuned against exactly these values.

use super::buffer::LuminanceBuffer;
use super::geometry::Rect;
use super::source::LuminanceError;
use image::{DynamicImage, GrayImage, ImageBuffer, Rgba, RgbaImage};
use serde::Serialize;

/// 16-bit-per-channel RGBA buffer.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

const DIVISOR: u32 = 4 * 0xFFFF;

/// Pixel format classes a source image can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    Grayscale,
    HighPrecisionRgba,
    GenericRgba,
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PixelFormat::Grayscale => "grayscale",
            PixelFormat::HighPrecisionRgba => "rgba16",
            PixelFormat::GenericRgba => "rgba8",
        })
    }
}

/// A borrowed image tagged with the strategy that reads it.
#[derive(Debug, Clone, Copy)]
pub enum PixelLayout<'a> {
    Grayscale(&'a GrayImage),
    HighPrecisionRgba(&'a Rgba16Image),
    GenericRgba(&'a RgbaImage),
}

impl<'a> PixelLayout<'a> {
    /// Select a strategy for `image`, `None` if its layout has no direct path.
    pub fn probe(image: &'a DynamicImage) -> Option<Self> {
        match image {
            DynamicImage::ImageLuma8(gray) => Some(Self::Grayscale(gray)),
            DynamicImage::ImageRgba16(rgba) => Some(Self::HighPrecisionRgba(rgba)),
            DynamicImage::ImageRgba8(rgba) => Some(Self::GenericRgba(rgba)),
            _ => None,
        }
    }

    pub fn format(&self) -> PixelFormat {
        match self {
            Self::Grayscale(_) => PixelFormat::Grayscale,
            Self::HighPrecisionRgba(_) => PixelFormat::HighPrecisionRgba,
            Self::GenericRgba(_) => PixelFormat::GenericRgba,
        }
    }

    /// The image rectangle, always anchored at the origin.
    pub fn bounds(&self) -> Rect {
        let (w, h) = match self {
            Self::Grayscale(img) => img.dimensions(),
            Self::HighPrecisionRgba(img) => img.dimensions(),
            Self::GenericRgba(img) => img.dimensions(),
        };
        Rect::full(w as usize, h as usize)
    }
}

/// A buffer together with the strategy that produced it.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub buffer: LuminanceBuffer,
    pub format: PixelFormat,
}

/// Replicate an 8-bit channel into 16 bits (`0xAB` → `0xABAB`).
#[inline]
pub fn widen(v: u8) -> u16 {
    (u16::from(v) << 8) | u16::from(v)
}

/// Luma of a 16-bit straight-alpha pixel composited over white.
#[inline]
pub fn composite_luma(r: u16, g: u16, b: u16, a: u16) -> u8 {
    let (r, g, b, a) = (u32::from(r), u32::from(g), u32::from(b), u32::from(a));
    let lum = (r + 2 * g + b) * 255 / DIVISOR;
    ((lum * a + (0xFFFF - a) * 255) / 0xFFFF) as u8
}

/// Extract any decoded image.
///
/// Layouts without a direct strategy are converted first: 16-bit layouts to
/// `Rgba<u16>`, everything else to `Rgba<u8>`.
pub fn extract(image: &DynamicImage) -> ExtractedImage {
    if let Some(layout) = PixelLayout::probe(image) {
        return extract_layout_full(layout);
    }
    let color = image.color();
    if color.bytes_per_pixel() / color.channel_count() > 1 {
        tracing::debug!(?color, "no direct strategy, converting to rgba16");
        extract_layout_full(PixelLayout::HighPrecisionRgba(&image.to_rgba16()))
    } else {
        tracing::debug!(?color, "no direct strategy, converting to rgba8");
        extract_layout_full(PixelLayout::GenericRgba(&image.to_rgba8()))
    }
}

/// Extract the whole image.
pub fn extract_layout_full(layout: PixelLayout<'_>) -> ExtractedImage {
    ExtractedImage {
        buffer: extract_unchecked(layout, layout.bounds()),
        format: layout.format(),
    }
}

/// Extract `region` (image coordinates) of `layout`.
///
/// # Errors
/// [`LuminanceError::OutOfBounds`] when `region` is not inside the image.
pub fn extract_layout(
    layout: PixelLayout<'_>,
    region: Rect,
) -> Result<ExtractedImage, LuminanceError> {
    let bounds = layout.bounds();
    if !bounds.contains_relative(&region) {
        return Err(LuminanceError::out_of_bounds(region, bounds));
    }
    Ok(ExtractedImage {
        buffer: extract_unchecked(layout, region),
        format: layout.format(),
    })
}

fn extract_unchecked(layout: PixelLayout<'_>, region: Rect) -> LuminanceBuffer {
    tracing::debug!(format = %layout.format(), ?region, "extracting luminance");
    let luminances = match layout {
        PixelLayout::Grayscale(img) => copy_gray(img, region),
        PixelLayout::HighPrecisionRgba(img) => blend_rows(region, |x, y| {
            let [r, g, b, a] = img.get_pixel(x, y).0;
            composite_luma(r, g, b, a)
        }),
        PixelLayout::GenericRgba(img) => blend_rows(region, |x, y| {
            let [r, g, b, a] = img.get_pixel(x, y).0;
            composite_luma(widen(r), widen(g), widen(b), widen(a))
        }),
    };
    LuminanceBuffer::packed(region.width, region.height, luminances)
}

fn copy_gray(img: &GrayImage, region: Rect) -> Vec<u8> {
    let stride = img.width() as usize;
    let raw = img.as_raw();
    let area = region.area().unwrap_or(0);
    if region.left == 0 && region.top == 0 && region.width == stride {
        return raw[..area].to_vec();
    }
    let mut out = Vec::with_capacity(area);
    for y in region.top..region.top + region.height {
        let start = y * stride + region.left;
        out.extend_from_slice(&raw[start..start + region.width]);
    }
    out
}

/// Row-major walk over `region`, one output byte per pixel.
fn blend_rows(region: Rect, mut pixel: impl FnMut(u32, u32) -> u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(region.area().unwrap_or(0));
    for y in region.top..region.top + region.height {
        for x in region.left..region.left + region.width {
            out.push(pixel(x as u32, y as u32));
        }
    }
    out
}
