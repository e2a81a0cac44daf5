use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use grid_cutter::{SamplerConfig, TileSampler, output::write_rotations, sampler};
use orient::jpeg::DEFAULT_QUALITY;
use tracing::info;

/// Cut the most text-like tiles out of a scanned page and dump them, in all four
/// orientations, for side-by-side comparison with synthetic training images.
#[derive(Parser, Debug)]
#[command(name = "grid-cutter", version)]
struct Args {
    /// Input image file
    input: PathBuf,

    /// Output directory for tiles
    output: PathBuf,

    /// Tile size in pixels
    #[arg(short = 's', long = "size", default_value_t = 32)]
    size: u32,

    /// Number of tiles to create
    #[arg(short = 'n', long = "num", default_value_t = 50)]
    num: usize,

    /// Shuffled pool size as a multiple of --num
    #[arg(long, default_value_t = sampler::OVERSAMPLE)]
    oversample: usize,

    /// Shuffle seed
    #[arg(long, default_value_t = sampler::SHUFFLE_SEED)]
    seed: u64,

    /// JPEG quality
    #[arg(short, long, default_value_t = DEFAULT_QUALITY)]
    quality: u8,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let img = image::open(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let sampler = TileSampler::new(SamplerConfig {
        oversample: args.oversample,
        seed: args.seed,
        ..SamplerConfig::default()
    });
    let tiles = sampler
        .sample(&img, args.num, args.size)
        .with_context(|| format!("sampling {}", args.input.display()))?;

    let written = write_rotations(&args.output, &tiles, args.quality)
        .with_context(|| format!("writing tiles to {}", args.output.display()))?;

    info!(tiles = tiles.len(), files = written.len(), "Done");
    Ok(())
}
