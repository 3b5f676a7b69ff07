//! Tool configuration module.
//!
//! Handles loading and validating `luma.toml`. Every key is optional; a
//! missing file means stock defaults. Command-line flags override whatever
//! the file says (see `main.rs`).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [transform]
//! invert = false            # Negate luminance (255 - v)
//! rotate = 0                # Quarter turns counter-clockwise (0-3)
//! # crop = [0, 0, 640, 480] # left, top, width, height
//!
//! [output]
//! directory = "luma-out"    # Where extracted PNGs are written
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//!
//! [logging]
//! filter = "info"           # tracing filter; RUST_LOG takes precedence
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::luminance::Rect;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "luma.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LumaConfig {
    /// Transforms applied after extraction.
    pub transform: TransformConfig,
    /// Output location for extracted luminance images.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Log filter defaults.
    pub logging: LoggingConfig,
}

impl LumaConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transform.rotate > 3 {
            return Err(ConfigError::Validation(
                "transform.rotate must be 0-3 quarter turns".into(),
            ));
        }
        if matches!(self.transform.crop, Some([_, _, w, h]) if w == 0 || h == 0) {
            return Err(ConfigError::Validation(
                "transform.crop width and height must be non-zero".into(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.filter must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// `[left, top, width, height]` relative to the extracted image.
    pub crop: Option<[usize; 4]>,
    pub invert: bool,
    /// Quarter turns counter-clockwise.
    pub rotate: u8,
}

impl TransformConfig {
    pub fn crop_rect(&self) -> Option<Rect> {
        self.crop.map(|[l, t, w, h]| Rect::new(l, t, w, h))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("luma-out"),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel extraction workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Load and validate a config file.
///
/// Returns stock defaults if `path` does not exist.
pub fn load_config(path: &Path) -> Result<LumaConfig, ConfigError> {
    if !path.exists() {
        return Ok(LumaConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: LumaConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `luma.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# luma configuration
# ==================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Transforms applied to every extracted image, in this order:
# crop, invert, rotate.
# ---------------------------------------------------------------------------
[transform]
# Window to keep: [left, top, width, height] in pixels.
# crop = [0, 0, 640, 480]

# Negate luminance so dark becomes light.
invert = false

# Quarter turns counter-clockwise (0-3).
rotate = 0

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Extracted images are written here as <name>-luma.png.
directory = "luma-out"

# ---------------------------------------------------------------------------
# Parallel processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers. Omit for auto (= number of CPU cores).
# Values above the core count are clamped down.
# max_processes = 4

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# tracing filter directive. RUST_LOG overrides this when set.
filter = "info"
"##
}
