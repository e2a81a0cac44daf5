use std::path::PathBuf;

use orient::Orientation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no usable fonts found in {0}")]
    NoFonts(PathBuf),

    #[error("cannot read font directory {path}: {source}")]
    FontDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "rejected too many renders for {split}/{class} ({orientation}): {accepted} accepted after {attempts} attempts, lower the perplexity threshold or change the fonts"
    )]
    RejectionBudgetExhausted {
        split: String,
        class: usize,
        orientation: Orientation,
        accepted: usize,
        attempts: usize,
    },

    #[error("dataset I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("label serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rasterizer failure for a single attempt. Never fatal: the generator counts it as a
/// rejection and moves on to the next seed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}
