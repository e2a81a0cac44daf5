use std::{
    fs,
    path::{Path, PathBuf},
};

use image::GrayImage;
use orient::{Orientation, rotate, save_jpeg};
use tracing::{debug, warn};

use crate::error::TileError;

/// Next free file index in `dir`: one past the largest numeric file stem, 1 when empty.
pub fn next_index(dir: &Path) -> std::io::Result<u32> {
    let entries = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(1),
        Err(e) => return Err(e),
    };

    let mut max = 0;
    for entry in entries {
        let path = entry?.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        // "00012.jpg" and "00012.tmp.jpg" both belong to index 12
        let head = stem.split('.').next().unwrap_or(stem);
        match head.parse::<u32>() {
            Ok(i) => max = max.max(i),
            Err(_) => warn!(path = %path.display(), "Skipping non-numeric file"),
        }
    }
    max.checked_add(1).ok_or_else(index_exhausted)
}

fn index_exhausted() -> std::io::Error {
    std::io::Error::other("tile index space exhausted")
}

/// Append `tiles` to `dir` as `NNNNN.jpg`, continuing after the files already there.
pub fn write_tiles(dir: &Path, tiles: &[GrayImage], quality: u8) -> Result<Vec<PathBuf>, TileError> {
    fs::create_dir_all(dir)?;
    let first = next_index(dir)?;
    let mut written = Vec::with_capacity(tiles.len());
    for (offset, tile) in tiles.iter().enumerate() {
        let index = u32::try_from(offset)
            .ok()
            .and_then(|o| first.checked_add(o))
            .ok_or_else(index_exhausted)?;
        let path = dir.join(format!("{index:05}.jpg"));
        save_jpeg(&path, tile, quality)?;
        written.push(path);
    }
    debug!(dir = %dir.display(), count = written.len(), "Wrote tiles");
    Ok(written)
}

/// Write every tile once per orientation into `<out_dir>/<class_index>/`.
pub fn write_rotations(
    out_dir: &Path,
    tiles: &[GrayImage],
    quality: u8,
) -> Result<Vec<PathBuf>, TileError> {
    let mut written = Vec::new();
    for orientation in Orientation::ALL {
        let rotated: Vec<GrayImage> = tiles.iter().map(|t| rotate(t, orientation)).collect();
        let dir = out_dir.join(orientation.class_index().to_string());
        written.extend(write_tiles(&dir, &rotated, quality)?);
    }
    Ok(written)
}
