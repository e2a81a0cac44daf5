//! Picks informative square tiles out of a scanned page.
//!
//! Candidates come from a grid over the page with its margins trimmed off. They are ranked
//! by perplexity, the best `count * oversample` are kept, and that pool is shuffled with a
//! fixed seed so neighbouring output tiles rarely come from the same paragraph while the
//! result stays reproducible.

use image::{DynamicImage, GrayImage, imageops::FilterType};
use orient::{GrayView, PerplexityScorer};
use rand::{SeedableRng, seq::SliceRandom};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, info, instrument};

use crate::{error::TileError, geom::TileRect};

/// Longest side of the working image; larger scans are downscaled first.
pub const MAX_WORKING_SIZE: u32 = 2000;
/// Fraction trimmed from every edge, since dense text sits away from the margins.
pub const EDGE_PADDING: f64 = 0.1;
pub const OVERSAMPLE: usize = 3;
pub const SHUFFLE_SEED: u64 = 123;

#[derive(Clone, Copy, Debug)]
pub struct SamplerConfig {
    pub max_working_size: u32,
    pub edge_padding: f64,
    /// Size of the shuffled pool as a multiple of the requested tile count.
    pub oversample: usize,
    pub seed: u64,
    pub scorer: PerplexityScorer,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_working_size: MAX_WORKING_SIZE,
            edge_padding: EDGE_PADDING,
            oversample: OVERSAMPLE,
            seed: SHUFFLE_SEED,
            scorer: PerplexityScorer::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SampledTile {
    /// Position in working-image coordinates.
    pub rect: TileRect,
    pub perplexity: u32,
    pub image: GrayImage,
}

#[derive(Clone, Debug)]
pub struct TileSet {
    pub working_width: u32,
    pub working_height: u32,
    /// Margin-trimmed region all candidates were cut from.
    pub inner: TileRect,
    pub candidates: usize,
    pub tiles: Vec<SampledTile>,
}

struct Candidate<'a> {
    rect: TileRect,
    view: GrayView<'a>,
    perplexity: u32,
}

#[derive(Clone, Debug, Default)]
pub struct TileSampler {
    config: SamplerConfig,
}

impl TileSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// Return `count` tiles of `size x size` pixels.
    pub fn sample(
        &self,
        img: &DynamicImage,
        count: usize,
        size: u32,
    ) -> Result<Vec<GrayImage>, TileError> {
        let set = self.sample_tiles(img, count, size)?;
        Ok(set.tiles.into_iter().map(|t| t.image).collect())
    }

    #[instrument(skip(self, img), fields(width = img.width(), height = img.height()))]
    pub fn sample_tiles(
        &self,
        img: &DynamicImage,
        count: usize,
        size: u32,
    ) -> Result<TileSet, TileError> {
        if size == 0 {
            return Err(TileError::ZeroTileSize);
        }

        let gray = self.working_image(img);
        let (width, height) = gray.dimensions();
        let inner = self.inner_rect(width, height);

        // One cell of slack so the last row and column never touch the inner boundary.
        let cols = (inner.w / size) as i64 - 1;
        let rows = (inner.h / size) as i64 - 1;
        if cols < 0 || rows < 0 {
            return Err(TileError::ImageTooSmall {
                width,
                height,
                tile_size: size,
            });
        }

        let view = GrayView::from_image(&gray);
        let mut candidates = Vec::with_capacity((cols * rows) as usize);
        for ty in 0..rows as u32 {
            for tx in 0..cols as u32 {
                let rect = TileRect::new(inner.x + tx * size, inner.y + ty * size, size, size);
                let Some(crop) = view.crop(rect.x, rect.y, rect.w, rect.h) else {
                    continue;
                };
                candidates.push(Candidate {
                    rect,
                    view: crop,
                    perplexity: self.config.scorer.score(&crop),
                });
            }
        }
        let total = candidates.len();

        // sort_by is stable, so equal scores keep grid order
        candidates.sort_by(|a, b| b.perplexity.cmp(&a.perplexity));
        candidates.truncate(total.min(count.saturating_mul(self.config.oversample.max(1))));

        if count > candidates.len() {
            return Err(TileError::InsufficientTiles {
                requested: count,
                available: candidates.len(),
            });
        }

        debug!(
            total,
            pool = candidates.len(),
            best = candidates.first().map(|c| c.perplexity),
            "Ranked tile candidates"
        );

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed);
        candidates.shuffle(&mut rng);

        let tiles: Vec<SampledTile> = candidates
            .iter()
            .take(count)
            .map(|c| SampledTile {
                rect: c.rect,
                perplexity: c.perplexity,
                image: c.view.to_image(),
            })
            .collect();

        info!(count = tiles.len(), size, "Sampled tiles");
        Ok(TileSet {
            working_width: width,
            working_height: height,
            inner,
            candidates: total,
            tiles,
        })
    }

    fn working_image(&self, img: &DynamicImage) -> GrayImage {
        let gray = match img.as_luma8() {
            Some(g) => g.clone(),
            None => img.to_luma8(),
        };
        let (w, h) = gray.dimensions();
        let max = self.config.max_working_size;
        if w.max(h) <= max || max == 0 {
            return gray;
        }
        let (nw, nh) = if w >= h {
            (max, (h as u64 * max as u64 / w as u64).max(1) as u32)
        } else {
            ((w as u64 * max as u64 / h as u64).max(1) as u32, max)
        };
        debug!(from_w = w, from_h = h, nw, nh, "Downscaling page");
        image::imageops::resize(&gray, nw, nh, FilterType::Triangle)
    }

    fn inner_rect(&self, width: u32, height: u32) -> TileRect {
        let pad = self.config.edge_padding.clamp(0.0, 0.5);
        let x1 = (width as f64 * pad) as u32;
        let x2 = (width as f64 * (1.0 - pad)) as u32;
        let y1 = (height as f64 * pad) as u32;
        let y2 = (height as f64 * (1.0 - pad)) as u32;
        TileRect::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn noisy_page(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(w, h, |x, y| {
            let v = (x.wrapping_mul(2654435761) ^ y.wrapping_mul(40503)) >> 7;
            Luma([if v % 3 == 0 { 0 } else { 255 }])
        }))
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let err = TileSampler::default().sample(&noisy_page(100, 100), 1, 0);
        assert!(matches!(err, Err(TileError::ZeroTileSize)));
    }

    #[test]
    fn tiny_image_is_too_small() {
        let err = TileSampler::default().sample(&noisy_page(20, 20), 1, 32);
        assert!(matches!(err, Err(TileError::ImageTooSmall { tile_size: 32, .. })));
    }

    #[test]
    fn asking_for_more_than_the_grid_fails() {
        // inner 320x320 -> 9x9 grid
        let err = TileSampler::default().sample(&noisy_page(400, 400), 100, 32);
        match err {
            Err(TileError::InsufficientTiles {
                requested,
                available,
            }) => {
                assert_eq!(requested, 100);
                assert_eq!(available, 81);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn returns_exactly_the_requested_count() {
        let tiles = TileSampler::default()
            .sample(&noisy_page(400, 400), 30, 32)
            .unwrap();
        assert_eq!(tiles.len(), 30);
        assert!(tiles.iter().all(|t| t.dimensions() == (32, 32)));
    }

    #[test]
    fn large_scans_are_downscaled_preserving_aspect() {
        let set = TileSampler::default()
            .sample_tiles(&noisy_page(3000, 1200), 5, 32)
            .unwrap();
        assert_eq!((set.working_width, set.working_height), (2000, 800));

        let portrait = TileSampler::default()
            .sample_tiles(&noisy_page(1000, 2500), 5, 32)
            .unwrap();
        assert_eq!((portrait.working_width, portrait.working_height), (800, 2000));
    }

    #[test]
    fn color_input_is_converted() {
        let rgb = DynamicImage::ImageRgb8(noisy_page(300, 300).to_rgb8());
        let gray = noisy_page(300, 300);
        let a = TileSampler::default().sample(&rgb, 4, 32).unwrap();
        let b = TileSampler::default().sample(&gray, 4, 32).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oversample_of_one_keeps_only_the_best() {
        let sampler = TileSampler::new(SamplerConfig {
            oversample: 1,
            ..SamplerConfig::default()
        });
        let set = sampler.sample_tiles(&noisy_page(600, 600), 10, 32).unwrap();
        let mut all = TileSampler::new(SamplerConfig {
            oversample: 1000,
            ..SamplerConfig::default()
        })
        .sample_tiles(&noisy_page(600, 600), set.candidates, 32)
        .unwrap()
        .tiles
        .into_iter()
        .map(|t| t.perplexity)
        .collect::<Vec<_>>();
        all.sort_unstable_by(|a, b| b.cmp(a));
        let floor = all[9];
        assert!(set.tiles.iter().all(|t| t.perplexity >= floor));
    }
}
