//! Convert a color-coded floorplan image into the simulation engine's
//! grid text file plus the door-size calibration constants, end to end:
//! optional generator trigger, raster read, boundary mask, conversion,
//! grid and debug-artifact writes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use egress_io::{AllInterior, GeneratorClient, MaskFile};
use egress_pipeline::boundary::BoundaryProvider;
use egress_pipeline::{CellAlphabet, ConvertConfig, ShrinkOrder, convert_staged};

/// Convert a floorplan image into a simulation grid and calibration
/// constants.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Combined floorplan image (walls blue, windows green, doors red,
    /// obstacles black).
    input: PathBuf,

    /// Output path for the grid text file.
    #[arg(short, long)]
    output: PathBuf,

    /// Prerendered interior/exterior mask image. Without one, every
    /// cell is treated as building interior.
    #[arg(long, value_name = "PATH")]
    boundary_mask: Option<PathBuf>,

    /// Generator service endpoint to trigger before reading the input
    /// (e.g. http://127.0.0.1:5000/run_GAN).
    #[arg(long, value_name = "URL")]
    generator_url: Option<String>,

    /// Timeout per generator request, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    generator_timeout_secs: u64,

    /// White margin width in pixels added around the floorplan.
    #[arg(long, default_value_t = 20)]
    border: u32,

    /// Shrink loop threshold: stop once either dimension fits.
    #[arg(long, default_value_t = 200)]
    min_dimension: u32,

    /// Per-step shrink factor, strictly between 0 and 1.
    #[arg(long, default_value_t = 0.5)]
    shrink_factor: f32,

    /// Whether segmentation runs before or after the shrink loop.
    #[arg(long, value_enum, default_value_t = OrderArg::ShrinkFirst)]
    order: OrderArg,

    /// How door cells are coded in the output grid.
    #[arg(long, value_enum, default_value_t = DoorLabelArg::Door)]
    door_label: DoorLabelArg,

    /// Directory for intermediate mask PNGs (written only when given).
    #[arg(long, value_name = "DIR")]
    debug_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    /// Shrink to the working resolution, then segment.
    ShrinkFirst,
    /// Segment at full resolution, then shrink and resample each mask.
    SegmentFirst,
}

impl From<OrderArg> for ShrinkOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::ShrinkFirst => Self::ShrinkThenSegment,
            OrderArg::SegmentFirst => Self::SegmentThenShrink,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DoorLabelArg {
    /// Plain doors, coded `D`.
    Door,
    /// Doors double as simulation exits, coded `E`.
    Exit,
}

impl From<DoorLabelArg> for CellAlphabet {
    fn from(label: DoorLabelArg) -> Self {
        match label {
            DoorLabelArg::Door => Self::plain_doors(),
            DoorLabelArg::Exit => Self::exit_doors(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Some(url) = &args.generator_url {
        let client = GeneratorClient::new(
            url.clone(),
            Duration::from_secs(args.generator_timeout_secs),
        )
        .context("building generator client")?;
        client
            .run(&args.input)
            .context("triggering floorplan generation")?;
    }

    info!(input = %args.input.display(), "reading floorplan");
    let bytes = egress_io::read_raster(&args.input)?;

    let config = ConvertConfig {
        border_px: args.border,
        min_dimension: args.min_dimension,
        shrink_factor: args.shrink_factor,
        shrink_order: args.order.into(),
        alphabet: args.door_label.into(),
    };

    let provider: Box<dyn BoundaryProvider> = match &args.boundary_mask {
        Some(path) => Box::new(MaskFile::new(path)),
        None => {
            warn!("no boundary mask given, treating the whole floorplan as interior");
            Box::new(AllInterior)
        }
    };

    let staged = convert_staged(&bytes, provider.as_ref(), &config)
        .context("converting floorplan")?;

    info!(
        width = staged.dimensions.width,
        height = staged.dimensions.height,
        scale = staged.scale,
        "assembled grid"
    );
    let calibration = staged.calibration;
    info!(
        door_size = calibration.door_size,
        max_speed = calibration.max_speed,
        grid_speed_limit = calibration.grid_speed_limit,
        smoke_radius = calibration.smoke_radius,
        smoke_spread_rate = calibration.smoke_spread_rate,
        smoke_spread_threshold = calibration.smoke_spread_threshold,
        "calibration constants"
    );

    if let Some(dir) = &args.debug_dir {
        egress_io::write_debug_masks(dir, &staged).context("writing debug masks")?;
    }

    egress_io::write_grid(&args.output, &staged.grid, &config.alphabet)
        .context("writing grid")?;
    info!(output = %args.output.display(), "done");

    Ok(())
}
