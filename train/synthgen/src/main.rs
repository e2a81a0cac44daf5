use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use synthgen::{
    FontSet, GeneratorConfig, GlyphRasterizer, SyntheticImageGenerator,
    dataset::{self, DatasetConfig, SplitSpec},
    generator,
};
use tracing::{debug, info};

/// Render random text at each of the four page orientations and write the accepted
/// images out as a labeled train/val dataset.
#[derive(Parser, Debug)]
#[command(name = "synthgen", version)]
struct Args {
    /// Directory with .ttf/.otf files
    #[arg(long, default_value = "fonts")]
    fonts: PathBuf,

    /// Dataset root
    #[arg(short, long, default_value = "images")]
    out: PathBuf,

    /// Images per class in the train split
    #[arg(long, default_value_t = dataset::NUM_TRAIN)]
    train: usize,

    /// Images per class in the val split
    #[arg(long, default_value_t = dataset::NUM_VAL)]
    val: usize,

    /// Minimum perplexity an image needs to be kept
    #[arg(long, default_value_t = generator::MIN_PERPLEXITY)]
    min_perplexity: u32,

    /// Attempts allowed per requested image
    #[arg(long, default_value_t = dataset::MAX_ATTEMPT_RATIO)]
    max_attempt_ratio: usize,

    /// First seed of the run
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// JPEG quality
    #[arg(short, long, default_value_t = orient::jpeg::DEFAULT_QUALITY)]
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

    let fonts = FontSet::load_dir(&args.fonts)
        .with_context(|| format!("loading fonts from {}", args.fonts.display()))?;
    for family in fonts.families() {
        debug!(family = family.name(), weights = ?family.weights().collect::<Vec<_>>(), "Font family");
    }

    let generator = SyntheticImageGenerator::new(
        GlyphRasterizer::new(&fonts),
        GeneratorConfig {
            min_perplexity: args.min_perplexity,
            ..GeneratorConfig::default()
        },
    );
    let config = DatasetConfig {
        out_dir: args.out.clone(),
        splits: vec![
            SplitSpec::new("train", args.train),
            SplitSpec::new("val", args.val),
        ],
        max_attempt_ratio: args.max_attempt_ratio,
        jpeg_quality: args.quality,
        first_seed: args.seed,
    };

    let summary = dataset::build(&config, &generator)
        .with_context(|| format!("building dataset in {}", args.out.display()))?;

    let accepted: usize = summary.classes.iter().map(|c| c.accepted).sum();
    let attempts: usize = summary.classes.iter().map(|c| c.attempts()).sum();
    info!(accepted, attempts, next_seed = summary.next_seed, "Dataset written");
    Ok(())
}
