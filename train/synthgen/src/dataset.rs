//! Fills `<out>/<split>/<class>/` directories with accepted synthetic samples.
//!
//! Seeds come from one counter that only ever moves forward across the whole run, so
//! every attempt (accepted or not) has a unique, replayable seed.

use std::path::PathBuf;

use orient::{Orientation, jpeg::DEFAULT_QUALITY};
use tracing::{info, instrument, warn};

use crate::{
    error::GenerateError,
    generator::{Attempt, SyntheticImageGenerator},
    io::DatasetWriter,
    render::Rasterizer,
};

pub const NUM_TRAIN: usize = 1000;
pub const NUM_VAL: usize = 100;
/// Attempts allowed per requested image before the run is declared miscalibrated.
pub const MAX_ATTEMPT_RATIO: usize = 3;

#[derive(Clone, Debug)]
pub struct SplitSpec {
    pub name: String,
    pub count: usize,
}

impl SplitSpec {
    pub fn new(name: &str, count: usize) -> Self {
        Self {
            name: name.to_string(),
            count,
        }
    }
}

pub struct DatasetConfig {
    pub out_dir: PathBuf,
    pub splits: Vec<SplitSpec>,
    pub max_attempt_ratio: usize,
    pub jpeg_quality: u8,
    pub first_seed: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("images"),
            splits: vec![SplitSpec::new("train", NUM_TRAIN), SplitSpec::new("val", NUM_VAL)],
            max_attempt_ratio: MAX_ATTEMPT_RATIO,
            jpeg_quality: DEFAULT_QUALITY,
            first_seed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassSummary {
    pub split: String,
    pub orientation: Orientation,
    pub accepted: usize,
    pub rejected: usize,
    pub faulted: usize,
}

impl ClassSummary {
    pub fn attempts(&self) -> usize {
        self.accepted + self.rejected + self.faulted
    }
}

#[derive(Clone, Debug, Default)]
pub struct DatasetSummary {
    pub classes: Vec<ClassSummary>,
    /// First seed not consumed by this run.
    pub next_seed: u64,
}

pub struct DatasetBuilder<'g, R> {
    generator: &'g SyntheticImageGenerator<R>,
    writer: DatasetWriter,
    max_attempt_ratio: usize,
    seed: u64,
}

impl<'g, R: Rasterizer> DatasetBuilder<'g, R> {
    pub fn new(generator: &'g SyntheticImageGenerator<R>, config: &DatasetConfig) -> Self {
        Self {
            generator,
            writer: DatasetWriter::new(&config.out_dir, config.jpeg_quality),
            max_attempt_ratio: config.max_attempt_ratio.max(1),
            seed: config.first_seed,
        }
    }

    pub fn next_seed(&self) -> u64 {
        self.seed
    }

    pub fn begin_split(&mut self, split: &str) -> Result<(), GenerateError> {
        self.writer.begin_split(split)?;
        Ok(())
    }

    /// Produce exactly `count` accepted images for one split/orientation pair, replacing
    /// anything previously in that class directory.
    #[instrument(skip(self), fields(class = orientation.class_index()))]
    pub fn build_class(
        &mut self,
        split: &str,
        orientation: Orientation,
        count: usize,
    ) -> Result<ClassSummary, GenerateError> {
        info!("Generating {split} {} {}", orientation.class_index(), orientation.degrees());
        self.writer.reset_class_dir(split, orientation)?;

        let budget = count.saturating_mul(self.max_attempt_ratio);
        let mut summary = ClassSummary {
            split: split.to_string(),
            orientation,
            accepted: 0,
            rejected: 0,
            faulted: 0,
        };

        while summary.accepted < count {
            if summary.attempts() >= budget {
                return Err(GenerateError::RejectionBudgetExhausted {
                    split: split.to_string(),
                    class: orientation.class_index(),
                    orientation,
                    accepted: summary.accepted,
                    attempts: summary.attempts(),
                });
            }
            let seed = self.seed;
            self.seed += 1;

            match self.generator.generate(seed, orientation) {
                Attempt::Accepted(sample) => {
                    self.writer.write_sample(split, summary.accepted, &sample)?;
                    summary.accepted += 1;
                }
                Attempt::Rejected { .. } => summary.rejected += 1,
                Attempt::Faulted(_) => summary.faulted += 1,
            }
        }

        if summary.faulted > 0 {
            warn!(faulted = summary.faulted, "Some renders faulted");
        }
        info!(
            accepted = summary.accepted,
            rejected = summary.rejected,
            faulted = summary.faulted,
            "Class complete"
        );
        Ok(summary)
    }

    pub fn finish(mut self) -> Result<(), GenerateError> {
        self.writer.finalize()?;
        Ok(())
    }
}

/// Generate every split in `config`, each across all four orientation classes in class
/// order.
pub fn build<R: Rasterizer>(
    config: &DatasetConfig,
    generator: &SyntheticImageGenerator<R>,
) -> Result<DatasetSummary, GenerateError> {
    let mut builder = DatasetBuilder::new(generator, config);
    let mut summary = DatasetSummary::default();

    for split in &config.splits {
        builder.begin_split(&split.name)?;
        for orientation in Orientation::ALL {
            summary
                .classes
                .push(builder.build_class(&split.name, orientation, split.count)?);
        }
    }
    summary.next_seed = builder.next_seed();
    builder.finish()?;
    Ok(summary)
}
