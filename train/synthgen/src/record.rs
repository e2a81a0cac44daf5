use serde::Serialize;

use crate::fonts::FontWeight;

/// One line of `labels.jsonl`.
#[derive(Serialize, Debug)]
pub struct LabelRecord<'a> {
    pub schema: &'static str,
    /// Path relative to the dataset root.
    pub image: String,
    pub split: &'a str,
    pub class: usize,
    pub degrees: u32,
    pub seed: u64,
    pub perplexity: u32,
    pub font: &'a str,
    pub weight: FontWeight,
}
