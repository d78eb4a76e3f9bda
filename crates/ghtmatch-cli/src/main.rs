//! ghtmatch CLI - find a template shape in an image.

use clap::{Args, Parser, Subcommand};
use ghtmatch_core::Color;
use ghtmatch_hough::{
    CannyEdgeDetector, Detection, EdgeDetector, GeneralizedHough, GhtOptions, RTable,
    render_detections,
};
use ghtmatch_io::ImageFormat;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ghtmatch")]
#[command(about = "Rotation- and scale-tolerant shape matching (Generalized Hough Transform)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the template in an image.
    Match(MatchArgs),

    /// Print the orientation bin sizes of a template's R-table.
    Rtable(RtableArgs),
}

#[derive(Debug, Clone, Args)]
struct OptionArgs {
    /// JSON file with matching options; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rotation range in degrees, as `min:max:step` or a single angle.
    #[arg(long, allow_hyphen_values = true)]
    rotation: Option<RangeArg>,

    /// Scale range, as `min:max:step` or a single ratio.
    #[arg(long, allow_hyphen_values = true)]
    scale: Option<RangeArg>,

    /// Minimum distance between detections in pixels (default: template width / 4).
    #[arg(long)]
    radius: Option<f64>,

    /// Number of orientation bins (default: derived from the rotation step).
    #[arg(long)]
    bins: Option<usize>,

    /// Build accumulators on one thread.
    #[arg(long)]
    sequential: bool,
}

#[derive(Debug, Clone, Args)]
struct MatchArgs {
    /// Path to the template image.
    #[arg(long)]
    template: PathBuf,

    /// Path to the image to search.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the image with detections outlined (PNG or PNM).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to write the detections (JSON).
    #[arg(long)]
    json: Option<PathBuf>,

    /// Outline thickness in pixels.
    #[arg(long, default_value = "3")]
    line_width: u32,

    #[command(flatten)]
    options: OptionArgs,
}

#[derive(Debug, Clone, Args)]
struct RtableArgs {
    /// Path to the template image.
    #[arg(long)]
    template: PathBuf,

    #[command(flatten)]
    options: OptionArgs,
}

/// `min:max:step` triple; a single value leaves the step unset.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RangeArg {
    min: f64,
    max: f64,
    step: Option<f64>,
}

impl FromStr for RangeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let nums = parts
            .iter()
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("bad number in range '{}': {}", s, e))?;
        match nums.as_slice() {
            &[v] => Ok(Self {
                min: v,
                max: v,
                step: None,
            }),
            &[min, max, step] => Ok(Self {
                min,
                max,
                step: Some(step),
            }),
            _ => Err(format!("expected 'min:max:step' or a single value, got '{}'", s)),
        }
    }
}

#[derive(Serialize)]
struct MatchReport<'a> {
    template: &'a Path,
    image: &'a Path,
    template_size: (u32, u32),
    origin: (i32, i32),
    empty_template: bool,
    hypotheses: usize,
    detections: &'a [Detection],
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match(args) => run_match(&args),
        Commands::Rtable(args) => run_rtable(&args),
    }
}

fn load_options(args: &OptionArgs) -> CliResult<GhtOptions> {
    let mut opts = match &args.config {
        Some(path) => {
            info!("Loading options: {}", path.display());
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<GhtOptions>(&text)?
        }
        None => GhtOptions::default(),
    };
    if let Some(r) = args.rotation {
        let step = r.step.map_or(opts.delta_rotation, f64::to_radians);
        opts = opts.with_rotation_range(r.min.to_radians(), r.max.to_radians(), step);
    }
    if let Some(s) = args.scale {
        let step = s.step.unwrap_or(opts.delta_scale);
        opts = opts.with_scale_range(s.min, s.max, step);
    }
    if let Some(radius) = args.radius {
        opts = opts.with_suppression_radius(radius);
    }
    if let Some(bins) = args.bins {
        opts = opts.with_bin_count(bins);
    }
    if args.sequential {
        opts = opts.with_parallel(false);
    }
    opts.validate()?;
    Ok(opts)
}

fn run_match(args: &MatchArgs) -> CliResult<()> {
    let opts = load_options(&args.options)?;

    info!("Loading template: {}", args.template.display());
    let template = ghtmatch_io::read_image(&args.template)?;
    info!("Loading image: {}", args.image.display());
    let image = ghtmatch_io::read_image(&args.image)?;
    let (w, h) = image.dimensions();
    info!("Image size: {}x{}", w, h);

    let session = GeneralizedHough::from_template(&template, opts)?;
    info!(
        "{} template displacements, {} hypotheses",
        session.table().len(),
        session.grid().len()
    );
    let result = session.match_image(&image)?;

    for det in &result.detections {
        println!("{}", det);
    }

    if let Some(out) = &args.out {
        let (tw, th) = session.template_size();
        let overlay =
            render_detections(&image, &result.detections, tw, th, Color::RED, args.line_width)?;
        let format = ImageFormat::from_path(out).unwrap_or(ImageFormat::Png);
        ghtmatch_io::write_image(&overlay, out, format)?;
        info!("Overlay written to {}", out.display());
    }

    if let Some(path) = &args.json {
        let report = MatchReport {
            template: &args.template,
            image: &args.image,
            template_size: session.template_size(),
            origin: session.origin(),
            empty_template: result.empty_template,
            hypotheses: result.outcomes.len(),
            detections: &result.detections,
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!("Detections written to {}", path.display());
    }

    Ok(())
}

fn run_rtable(args: &RtableArgs) -> CliResult<()> {
    let opts = load_options(&args.options)?;
    let template = ghtmatch_io::read_image(&args.template)?;
    let detector = CannyEdgeDetector::new(opts.canny_threshold1, opts.canny_threshold2);
    let field = detector.detect(&template)?;
    let (tw, th) = field.dimensions();
    let origin = opts.effective_origin(tw, th);
    let table = RTable::build(&field, origin, opts.effective_bin_count())?;

    println!("template {}x{}, origin ({}, {})", tw, th, origin.0, origin.1);
    println!(
        "{} displacements in {} bins",
        table.len(),
        table.bin_count()
    );
    for (i, n) in table.bin_sizes().into_iter().enumerate() {
        if n > 0 {
            println!("  bin {:3}: {}", i, n);
        }
    }
    Ok(())
}
