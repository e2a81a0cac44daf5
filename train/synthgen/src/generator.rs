use image::{GrayImage, imageops::FilterType};
use orient::{GrayView, Orientation, PerplexityScorer, rotate};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, instrument, warn};

use crate::{
    error::RenderError,
    fonts::FontWeight,
    params::{self, GenerationParameters},
    render::{CanvasCfg, Rasterizer},
};

/// Renders below this perplexity are too blank or too blotchy to teach anything.
pub const MIN_PERPLEXITY: u32 = 10;
pub const IMAGE_SIZE: u32 = 32;

pub struct GeneratorConfig {
    /// Side of the square training image.
    pub image_size: u32,
    pub min_perplexity: u32,
    pub lines: usize,
    pub word_len: usize,
    pub canvas: CanvasCfg,
    pub scorer: PerplexityScorer,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            image_size: IMAGE_SIZE,
            min_perplexity: MIN_PERPLEXITY,
            lines: params::LINES,
            word_len: params::WORD_LEN,
            canvas: CanvasCfg::default(),
            scorer: PerplexityScorer::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Sample {
    pub image: GrayImage,
    pub seed: u64,
    pub orientation: Orientation,
    pub perplexity: u32,
    pub font: String,
    pub weight: FontWeight,
}

#[derive(Debug)]
pub enum Attempt {
    Accepted(Sample),
    Rejected { perplexity: u32 },
    Faulted(RenderError),
}

impl Attempt {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Attempt::Accepted(_))
    }

    pub fn into_sample(self) -> Option<Sample> {
        match self {
            Attempt::Accepted(s) => Some(s),
            _ => None,
        }
    }
}

pub struct SyntheticImageGenerator<R> {
    rasterizer: R,
    config: GeneratorConfig,
}

impl<R: Rasterizer> SyntheticImageGenerator<R> {
    pub fn new(rasterizer: R, config: GeneratorConfig) -> Self {
        Self { rasterizer, config }
    }

    /// One render attempt. The same `seed` always draws the same parameters, so an
    /// accepted image can be reproduced and a rejected one inspected later.
    #[instrument(level = "trace", skip(self))]
    pub fn generate(&self, seed: u64, orientation: Orientation) -> Attempt {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let params = GenerationParameters::draw(
            &mut rng,
            self.rasterizer.family_count(),
            self.config.lines,
            self.config.word_len,
        );

        let raster = match self.rasterizer.rasterize(&params, &self.config.canvas) {
            Ok(img) => img,
            Err(e) => {
                warn!(seed, error = %e, "Render failed, counting as rejection");
                return Attempt::Faulted(e);
            }
        };

        let size = self.config.image_size;
        let small = image::imageops::resize(&raster.to_luma8(), size, size, FilterType::Triangle);
        let perplexity = self.config.scorer.score(&GrayView::from_image(&small));
        if perplexity < self.config.min_perplexity {
            debug!(seed, perplexity, "Rejected render");
            return Attempt::Rejected { perplexity };
        }

        Attempt::Accepted(Sample {
            image: rotate(&small, orientation),
            seed,
            orientation,
            perplexity,
            font: self
                .rasterizer
                .family_name(params.font_index)
                .unwrap_or_default()
                .to_string(),
            weight: params.weight,
        })
    }
}
