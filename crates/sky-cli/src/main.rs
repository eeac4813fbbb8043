//! sky - astronomical band scaling and compositing CLI
//!
//! Frontend for the skyrender engine: scale single bands to grayscale
//! previews, composite multiple filter bands into color frames, convert
//! coordinates through WCS headers, and fold light curves.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "sky")]
#[command(author, version, about = "Astronomical band scaling and compositing CLI")]
#[command(long_about = "
Offscreen rendering of astronomical survey bands.

Examples:
  sky scale band_r.raw -o preview.png --width 512 --height 512
  sky scale -o ramp.png                     # synthesized gradient
  sky scale band.raw -o out.png --width 256 --height 256 --low 200 --high 1800
  sky composite -b m101_r.raw=r -b m101_v.raw=v -b m101_b.raw=b \\
      --width 512 --height 512 -o m101.png
  sky wcs header.json --pixel 256,256       # pixel -> RA/Dec
  sky wcs header.json --sky 210.8,54.35     # RA/Dec -> pixel
  sky period curve.json --fold              # fold at the periodogram peak
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Scale one raw band to a grayscale PNG
    #[command(visible_alias = "s")]
    Scale(ScaleArgs),

    /// Composite multiple filter bands into a color PNG
    #[command(visible_alias = "comp")]
    Composite(CompositeArgs),

    /// Convert coordinates through a WCS header
    Wcs(WcsArgs),

    /// Select the periodogram peak and fold a light curve
    Period(PeriodArgs),
}

#[derive(Args)]
struct ScaleArgs {
    /// Raw band file (little-endian u16 samples); omitted synthesizes a
    /// horizontal gradient
    input: Option<PathBuf>,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Band width in pixels
    #[arg(long, default_value = "512")]
    width: u32,

    /// Band height in pixels
    #[arg(long, default_value = "512")]
    height: u32,

    /// Lower clip bound (raw units); defaults to the band minimum
    #[arg(long)]
    low: Option<f32>,

    /// Upper clip bound (raw units); defaults to the band maximum
    #[arg(long)]
    high: Option<f32>,

    /// Gamma exponent
    #[arg(short, long, default_value = "2.5")]
    gamma: f64,
}

#[derive(Args)]
struct CompositeArgs {
    /// Band inputs as file=filter pairs (e.g. m101_r.raw=r)
    #[arg(short = 'b', long = "band", required = true)]
    bands: Vec<String>,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Band width in pixels
    #[arg(long, default_value = "512")]
    width: u32,

    /// Band height in pixels
    #[arg(long, default_value = "512")]
    height: u32,

    /// Lower clip bound applied to every band
    #[arg(long)]
    low: Option<f32>,

    /// Upper clip bound applied to every band
    #[arg(long)]
    high: Option<f32>,

    /// Gamma exponent
    #[arg(short, long, default_value = "2.5")]
    gamma: f64,
}

#[derive(Args)]
struct WcsArgs {
    /// WCS header parameters (JSON)
    params: PathBuf,

    /// Pixel coordinates "x,y" to convert to RA/Dec
    #[arg(long, conflicts_with = "sky")]
    pixel: Option<String>,

    /// Sky coordinates "ra,dec" in degrees to convert to pixels
    #[arg(long)]
    sky: Option<String>,
}

#[derive(Args)]
struct PeriodArgs {
    /// Light curve file (JSON with frequency/power and optionally jd/mag)
    input: PathBuf,

    /// Fold the magnitude series and print the phased curve
    #[arg(long)]
    fold: bool,

    /// Fold period in days; defaults to the periodogram peak
    #[arg(long)]
    period: Option<f64>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scale(args) => commands::scale::run(args),
        Commands::Composite(args) => commands::composite::run(args),
        Commands::Wcs(args) => commands::wcs::run(args),
        Commands::Period(args) => commands::period::run(args),
    }
}
