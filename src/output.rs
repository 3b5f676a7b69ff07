//! CLI output formatting for the `luma` commands.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Extract
//!
//! ```text
//! photo.jpg → luma-out/photo-luma.png
//!     Format: rgba8
//!     Size: 640x480 → 480x640
//!     Mean luminance: 131.4
//! broken.png
//!     Failed: Image error: ...
//!
//! Extracted 1 image, 1 failed
//! ```
//!
//! ## Info
//!
//! ```text
//! photo.jpg
//!     Format: rgba8
//!     Size: 640x480
//!     Mean luminance: 131.4
//!     Crop: supported
//!     Rotate: supported
//! ```

use crate::luminance::{LuminanceSource, PixelFormat, mean_luminance};
use crate::pipeline::{BatchEvent, ProcessedImage};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn size((w, h): (usize, usize)) -> String {
    format!("{w}x{h}")
}

fn supported(flag: bool) -> &'static str {
    if flag { "supported" } else { "unsupported" }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Lines describing one processed image.
pub fn format_processed(processed: &ProcessedImage) -> Vec<String> {
    let size_line = if processed.source_dimensions == processed.dimensions {
        size(processed.dimensions)
    } else {
        format!(
            "{} → {}",
            size(processed.source_dimensions),
            size(processed.dimensions)
        )
    };
    vec![
        format!(
            "{} → {}",
            processed.source.display(),
            processed.output.display()
        ),
        format!("{}Format: {}", indent(1), processed.format),
        format!("{}Size: {}", indent(1), size_line),
        format!(
            "{}Mean luminance: {:.1}",
            indent(1),
            processed.mean_luminance
        ),
    ]
}

/// Lines for a progress event emitted during a batch.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Processed(processed) => format_processed(processed),
        BatchEvent::Failed { source, error } => vec![
            source.display().to_string(),
            format!("{}Failed: {}", indent(1), error),
        ],
    }
}

/// Closing summary line of an extract run.
pub fn format_batch_summary(succeeded: usize, failed: usize) -> String {
    if failed == 0 {
        format!("Extracted {}", plural(succeeded, "image"))
    } else {
        format!("Extracted {}, {} failed", plural(succeeded, "image"), failed)
    }
}

/// Lines for the `info` command.
pub fn format_info(path: &Path, format: PixelFormat, source: &dyn LuminanceSource) -> Vec<String> {
    vec![
        path.display().to_string(),
        format!("{}Format: {}", indent(1), format),
        format!(
            "{}Size: {}",
            indent(1),
            size((source.width(), source.height()))
        ),
        format!("{}Mean luminance: {:.1}", indent(1), mean_luminance(source)),
        format!("{}Crop: {}", indent(1), supported(source.is_crop_supported())),
        format!(
            "{}Rotate: {}",
            indent(1),
            supported(source.is_rotate_supported())
        ),
    ]
}

pub fn print_batch_event(event: &BatchEvent) {
    for line in format_batch_event(event) {
        println!("{}", line);
    }
}

pub fn print_info(path: &Path, format: PixelFormat, source: &dyn LuminanceSource) {
    for line in format_info(path, format, source) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::luminance::LuminanceBuffer;
    use std::path::PathBuf;

    fn processed(source_dimensions: (usize, usize), dimensions: (usize, usize)) -> ProcessedImage {
        ProcessedImage {
            source: PathBuf::from("photo.jpg"),
            output: PathBuf::from("out/photo-luma.png"),
            format: PixelFormat::GenericRgba,
            source_dimensions,
            dimensions,
            mean_luminance: 131.44,
        }
    }

    #[test]
    fn processed_lines() {
        let lines = format_processed(&processed((640, 480), (480, 640)));
        assert_eq!(
            lines,
            vec![
                "photo.jpg → out/photo-luma.png",
                "    Format: rgba8",
                "    Size: 640x480 → 480x640",
                "    Mean luminance: 131.4",
            ]
        );
    }

    #[test]
    fn unchanged_size_shown_once() {
        let lines = format_processed(&processed((10, 20), (10, 20)));
        assert_eq!(lines[2], "    Size: 10x20");
    }

    #[test]
    fn failed_event_lines() {
        let event = BatchEvent::Failed {
            source: PathBuf::from("broken.png"),
            error: "Image error: bad".into(),
        };
        assert_eq!(
            format_batch_event(&event),
            vec!["broken.png", "    Failed: Image error: bad"]
        );
    }

    #[test]
    fn summary_wording() {
        assert_eq!(format_batch_summary(1, 0), "Extracted 1 image");
        assert_eq!(format_batch_summary(3, 0), "Extracted 3 images");
        assert_eq!(format_batch_summary(2, 1), "Extracted 2 images, 1 failed");
    }

    #[test]
    fn info_lines() {
        let buffer = LuminanceBuffer::new(2, 1, vec![10, 20]).unwrap();
        let lines = format_info(Path::new("a.png"), PixelFormat::Grayscale, &buffer);
        assert_eq!(
            lines,
            vec![
                "a.png",
                "    Format: grayscale",
                "    Size: 2x1",
                "    Mean luminance: 15.0",
                "    Crop: supported",
                "    Rotate: supported",
            ]
        );
    }
}
