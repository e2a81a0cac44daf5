use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use orient::{Orientation, save_jpeg};
use tracing::debug;

use crate::{error::GenerateError, generator::Sample, record::LabelRecord};

/// Lays accepted samples out as `<root>/<split>/<class>/<NNN>.jpg` and appends one label
/// record per image to `<root>/<split>/labels.jsonl`.
pub struct DatasetWriter {
    root: PathBuf,
    quality: u8,
    labels: Option<BufWriter<File>>,
}

impl DatasetWriter {
    pub fn new(root: impl Into<PathBuf>, quality: u8) -> Self {
        Self {
            root: root.into(),
            quality,
            labels: None,
        }
    }

    pub fn class_dir(&self, split: &str, orientation: Orientation) -> PathBuf {
        self.root
            .join(split)
            .join(orientation.class_index().to_string())
    }

    /// Start a fresh `labels.jsonl` for `split`, flushing the previous one.
    pub fn begin_split(&mut self, split: &str) -> std::io::Result<()> {
        self.finalize()?;
        let dir = self.root.join(split);
        fs::create_dir_all(&dir)?;
        let file = File::create(dir.join("labels.jsonl"))?;
        self.labels = Some(BufWriter::with_capacity(1 << 20, file));
        Ok(())
    }

    /// Remove whatever an earlier run left in the class directory and recreate it empty.
    pub fn reset_class_dir(&self, split: &str, orientation: Orientation) -> std::io::Result<PathBuf> {
        let dir = self.class_dir(split, orientation);
        match fs::remove_dir_all(&dir) {
            Ok(()) => debug!(dir = %dir.display(), "Cleared stale class directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn write_sample(
        &mut self,
        split: &str,
        index: usize,
        sample: &Sample,
    ) -> Result<PathBuf, GenerateError> {
        let class = sample.orientation.class_index();
        let rel = format!("{split}/{class}/{index:03}.jpg");
        let path = self.root.join(&rel);
        save_jpeg(&path, &sample.image, self.quality)?;

        if let Some(ref mut writer) = self.labels {
            let rec = LabelRecord {
                schema: "v1",
                image: rel,
                split,
                class,
                degrees: sample.orientation.degrees(),
                seed: sample.seed,
                perplexity: sample.perplexity,
                font: &sample.font,
                weight: sample.weight,
            };
            serde_json::to_writer(&mut *writer, &rec)?;
            writeln!(writer)?;
        }
        Ok(path)
    }

    pub fn finalize(&mut self) -> std::io::Result<()> {
        if let Some(writer) = self.labels.take() {
            writer.into_inner()?.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for DatasetWriter {
    fn drop(&mut self) {
        let _ = self.finalize();
    }
}
