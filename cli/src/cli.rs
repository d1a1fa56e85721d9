use std::path::PathBuf;

/// Flood impact assessment CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "floodimpact", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Detect flooding and estimate losses to buildings, roads and hospitals
    Assess(AssessArgs),

    /// Detect flooding and report only the flooded area
    MaskArea(MaskAreaArgs),
}

/// Raster inputs and the run parameters that can be set from the command line.
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Pre-event JSON rasters (backscatter in dB), averaged into one composite
    #[arg(long, required = true, num_args = 1.., value_hint = clap::ValueHint::FilePath)]
    pub pre: Vec<PathBuf>,

    /// Post-event JSON rasters (backscatter in dB), averaged into one composite
    #[arg(long, required = true, num_args = 1.., value_hint = clap::ValueHint::FilePath)]
    pub post: Vec<PathBuf>,

    /// TOML configuration file; flags below override it
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Latitude of the area of interest center
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the area of interest center
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Radius of the area of interest, in kilometres
    #[arg(long)]
    pub buffer_km: Option<f64>,

    /// Change detection threshold on pre - post, in dB
    #[arg(long, allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Sampling scale of zonal reductions, in metres
    #[arg(long)]
    pub scale: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct AssessArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Building footprints (GeoJSON FeatureCollection)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub buildings: Option<PathBuf>,

    /// Road network (GeoJSON FeatureCollection)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub roads: Option<PathBuf>,

    /// Hospitals (GeoJSON FeatureCollection)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub hospitals: Option<PathBuf>,

    /// Output loss table, defaults to "./flood_damage_report.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write the full report as JSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub json: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct MaskAreaArgs {
    #[command(flatten)]
    pub run: RunArgs,
}
