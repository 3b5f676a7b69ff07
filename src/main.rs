use clap::{Parser, Subcommand};
use luma_source::config::{self, LumaConfig};
use luma_source::luminance::{self, Rect};
use luma_source::pipeline::{self, TransformPlan};
use luma_source::output;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Transform flags shared by commands that produce luminance output.
#[derive(clap::Args, Clone)]
struct TransformArgs {
    /// Crop window as LEFT,TOP,WIDTH,HEIGHT (overrides config)
    #[arg(long, value_name = "L,T,W,H", allow_hyphen_values = true)]
    crop: Option<String>,

    /// Invert luminance (overrides config)
    #[arg(long)]
    invert: bool,

    /// Quarter turns counter-clockwise, 0-3 (overrides config)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=3))]
    rotate: Option<u8>,
}

#[derive(Parser)]
#[command(name = "luma")]
#[command(about = "Extract luminance buffers for barcode binarizers")]
#[command(long_about = "\
Extract luminance buffers for barcode binarizers

Every input image is reduced to one byte of luminance per pixel:
grayscale images are copied as-is, colour images are weighted
(R + 2G + B) / 4 and composited over white using their alpha.

Transforms run in a fixed order: crop, invert, rotate.

Run 'luma gen-config' to generate a documented luma.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract luminance from images and write grayscale PNGs
    Extract {
        /// Input images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Write a JSON report of every processed image
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Show how an image would be extracted
    Info {
        /// Input image
        input: PathBuf,
    },
    /// Print a stock luma.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            inputs,
            output_dir,
            report,
            transform,
        } => {
            let luma_config = load_and_init(&cli.config)?;
            let plan = resolve_plan(&luma_config, &transform)?;
            let output_dir = output_dir.unwrap_or_else(|| luma_config.output.directory.clone());
            init_thread_pool(&luma_config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_batch_event(&event);
                }
            });
            let results = pipeline::process_batch(&inputs, &output_dir, &plan, Some(tx));
            printer.join().ok();

            let processed: Vec<_> = results.into_iter().filter_map(Result::ok).collect();
            let failed = inputs.len() - processed.len();
            if let Some(report_path) = report {
                pipeline::write_report(&report_path, &processed)?;
            }
            println!();
            println!("{}", output::format_batch_summary(processed.len(), failed));
            if failed > 0 {
                std::process::exit(1);
            }
        }
        Command::Info { input } => {
            load_and_init(&cli.config)?;
            let decoded = image::open(&input)?;
            let extracted = luminance::extract(&decoded);
            output::print_info(&input, extracted.format, &extracted.buffer);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file, then install logging using its filter.
fn load_and_init(path: &std::path::Path) -> Result<LumaConfig, config::ConfigError> {
    let luma_config = config::load_config(path)?;
    init_tracing(&luma_config);
    if path.exists() {
        tracing::debug!(path = %path.display(), "loaded config");
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
    }
    Ok(luma_config)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins; otherwise the configured filter is used.
fn init_tracing(config: &LumaConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Merge command-line transform flags over the configured plan.
fn resolve_plan(
    config: &LumaConfig,
    args: &TransformArgs,
) -> Result<TransformPlan, Box<dyn std::error::Error>> {
    let mut plan = TransformPlan::from_config(&config.transform);
    if let Some(spec) = &args.crop {
        plan.crop = Some(parse_crop(spec)?);
    }
    if args.invert {
        plan.invert = true;
    }
    if let Some(turns) = args.rotate {
        plan.quarter_turns = turns;
    }
    Ok(plan)
}

/// Parse `L,T,W,H`. Negative values are rejected as out of bounds, zero
/// width or height the same way `transform.crop` is in `luma.toml`.
fn parse_crop(spec: &str) -> Result<Rect, Box<dyn std::error::Error>> {
    let parts = spec
        .split(',')
        .map(|p| p.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()?;
    let [left, top, width, height] = parts[..] else {
        return Err(format!("--crop expects 4 comma-separated values, got '{spec}'").into());
    };
    if width == 0 || height == 0 {
        return Err(format!("--crop width and height must be non-zero, got '{spec}'").into());
    }
    let unbounded = Rect::full(usize::MAX, usize::MAX);
    Ok(Rect::try_from_signed(left, top, width, height, unbounded)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use luma_source::LuminanceError;

    fn args(crop: Option<&str>, invert: bool, rotate: Option<u8>) -> TransformArgs {
        TransformArgs {
            crop: crop.map(str::to_string),
            invert,
            rotate,
        }
    }

    #[test]
    fn parse_crop_reads_four_values() {
        assert_eq!(parse_crop("1, 2,3 ,4").unwrap(), Rect::new(1, 2, 3, 4));
    }

    #[test]
    fn parse_crop_rejects_wrong_arity() {
        let err = parse_crop("1,2,3").unwrap_err();
        assert!(err.to_string().contains("4 comma-separated values"));
        assert!(parse_crop("1,2,3,4,5").is_err());
    }

    #[test]
    fn parse_crop_rejects_garbage() {
        assert!(parse_crop("a,b,c,d").is_err());
        assert!(parse_crop("").is_err());
    }

    #[test]
    fn parse_crop_rejects_zero_size() {
        let err = parse_crop("0,0,0,5").unwrap_err();
        assert!(err.to_string().contains("non-zero"));
        assert!(parse_crop("0,0,5,0").is_err());
    }

    #[test]
    fn parse_crop_rejects_negative_as_out_of_bounds() {
        let err = parse_crop("-1,0,4,4").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LuminanceError>(),
            Some(LuminanceError::OutOfBounds { left: -1, .. })
        ));
    }

    #[test]
    fn resolve_plan_flags_override_config() {
        let mut luma_config = LumaConfig::default();
        luma_config.transform.crop = Some([0, 0, 8, 8]);
        luma_config.transform.rotate = 1;
        let plan = resolve_plan(&luma_config, &args(Some("1,1,2,2"), true, Some(3))).unwrap();
        assert_eq!(plan.crop, Some(Rect::new(1, 1, 2, 2)));
        assert!(plan.invert);
        assert_eq!(plan.quarter_turns, 3);
    }

    #[test]
    fn resolve_plan_keeps_config_without_flags() {
        let mut luma_config = LumaConfig::default();
        luma_config.transform.crop = Some([0, 0, 8, 8]);
        luma_config.transform.invert = true;
        luma_config.transform.rotate = 2;
        let plan = resolve_plan(&luma_config, &args(None, false, None)).unwrap();
        assert_eq!(plan.crop, Some(Rect::new(0, 0, 8, 8)));
        assert!(plan.invert);
        assert_eq!(plan.quarter_turns, 2);
    }

    #[test]
    fn resolve_plan_surfaces_crop_errors() {
        let zero_width = args(Some("0,0,0,5"), false, None);
        assert!(resolve_plan(&LumaConfig::default(), &zero_width).is_err());
    }
}
