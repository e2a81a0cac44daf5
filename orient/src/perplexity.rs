//! Horizontal text-density heuristic.
//!
//! Printed text, read along a row, flips between ink and paper many times over short
//! distances. Blank paper never flips, and a solid blob flips twice with a long run in
//! between. The score counts only the flips that close a short run, normalised per
//! thousand pixels, so it rises with how much of the tile looks like lines of glyphs.

use crate::view::GrayView;

/// Intensity step that counts as an edge.
pub const EDGE_DELTA: u8 = 40;

/// Longest run, as a percentage of the row width, that still counts as text-like.
pub const MAX_RUN_PERCENT: u32 = 33;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerplexityScorer {
    pub edge_delta: u8,
    pub max_run_percent: u32,
}

impl Default for PerplexityScorer {
    fn default() -> Self {
        Self {
            edge_delta: EDGE_DELTA,
            max_run_percent: MAX_RUN_PERCENT,
        }
    }
}

impl PerplexityScorer {
    pub fn score(&self, view: &GrayView<'_>) -> u32 {
        let width = view.width();
        let height = view.height();
        if width < 2 || height == 0 {
            return 0;
        }
        let max_run = (width as u64 * self.max_run_percent as u64 / 100).max(2);

        let mut short_runs: u64 = 0;
        for y in 0..height {
            short_runs += self.row_short_runs(view.row(y), max_run);
        }
        let area = width as u64 * height as u64;
        (short_runs * 1000 / area) as u32
    }

    /// Score a foreign buffer. Malformed geometry scores the minimum instead of failing.
    pub fn score_raw(&self, pixels: &[u8], width: u32, height: u32, stride: u32) -> u32 {
        match GrayView::new(pixels, width, height, stride) {
            Ok(view) => self.score(&view),
            Err(_) => 0,
        }
    }

    fn row_short_runs(&self, row: &[u8], max_run: u64) -> u64 {
        let mut count = 0;
        let mut last_edge: Option<usize> = None;
        for (x, pair) in row.windows(2).enumerate() {
            if pair[0].abs_diff(pair[1]) < self.edge_delta {
                continue;
            }
            if last_edge.is_some_and(|prev| (x - prev) as u64 <= max_run) {
                count += 1;
            }
            last_edge = Some(x);
        }
        count
    }
}

/// Score with the default edge and run thresholds.
pub fn perplexity(view: &GrayView<'_>) -> u32 {
    PerplexityScorer::default().score(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn stripes(width: u32, height: u32, period: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if (x / period) % 2 == 0 { Luma([0]) } else { Luma([255]) }
        })
    }

    #[test]
    fn blank_scores_minimum() {
        for &(w, h, v) in &[(32, 32, 255u8), (1, 1, 0), (7, 300, 0), (500, 3, 128), (10, 0, 0)] {
            let img = GrayImage::from_pixel(w, h, Luma([v]));
            assert_eq!(perplexity(&GrayView::from_image(&img)), 0, "{w}x{h} @ {v}");
        }
    }

    #[test]
    fn thin_inputs_do_not_panic() {
        let tall = stripes(1, 50, 1);
        assert_eq!(perplexity(&GrayView::from_image(&tall)), 0);

        let wide = stripes(64, 1, 2);
        assert!(perplexity(&GrayView::from_image(&wide)) > 0);
    }

    #[test]
    fn malformed_geometry_scores_minimum() {
        let scorer = PerplexityScorer::default();
        let buf = [0u8, 255, 0, 255];
        assert_eq!(scorer.score_raw(&buf, 4, 1, 2), 0);
        assert_eq!(scorer.score_raw(&buf, 0, 1, 4), 0);
        assert_eq!(scorer.score_raw(&buf, 4, 0, 4), 0);
        assert_eq!(scorer.score_raw(&buf, 4, 2, 4), 0);
        assert!(scorer.score_raw(&buf, 4, 1, 4) > 0);
    }

    #[test]
    fn dense_stripes_beat_solid_blob() {
        let text_like = stripes(32, 32, 2);
        let mut blob = GrayImage::from_pixel(32, 32, Luma([255]));
        for y in 4..28 {
            for x in 4..28 {
                blob.put_pixel(x, y, Luma([0]));
            }
        }
        let s_text = perplexity(&GrayView::from_image(&text_like));
        let s_blob = perplexity(&GrayView::from_image(&blob));
        assert!(s_text > 100, "text-like score {s_text}");
        assert_eq!(s_blob, 0);
    }

    #[test]
    fn translation_does_not_change_score() {
        let draw = |dx: u32, dy: u32| {
            let mut img = GrayImage::from_pixel(40, 40, Luma([255]));
            for y in 0..10 {
                for x in 0..16 {
                    if x % 3 == 0 {
                        img.put_pixel(x + dx, y + dy, Luma([0]));
                    }
                }
            }
            img
        };
        let a = draw(2, 3);
        let b = draw(20, 25);
        assert_eq!(
            perplexity(&GrayView::from_image(&a)),
            perplexity(&GrayView::from_image(&b))
        );
    }

    #[test]
    fn strided_view_scores_like_packed_copy() {
        let img = stripes(40, 20, 3);
        let view = GrayView::from_image(&img);
        let crop = view.crop(5, 2, 24, 16).unwrap();
        let packed = crop.to_image();
        assert_eq!(perplexity(&crop), perplexity(&GrayView::from_image(&packed)));
        assert_eq!(perplexity(&crop), perplexity(&crop));
    }

    #[test]
    fn empty_rows_score_minimum() {
        let img = GrayImage::new(10, 0);
        assert_eq!(perplexity(&GrayView::from_image(&img)), 0);
    }

    #[test]
    fn huge_run_percent_does_not_overflow() {
        let scorer = PerplexityScorer {
            max_run_percent: u32::MAX,
            ..PerplexityScorer::default()
        };
        let img = stripes(64, 4, 2);
        assert!(scorer.score(&GrayView::from_image(&img)) > 0);
    }

    #[test]
    fn faint_transitions_are_ignored() {
        let img = GrayImage::from_fn(32, 8, |x, _| Luma([if x % 2 == 0 { 120 } else { 140 }]));
        assert_eq!(perplexity(&GrayView::from_image(&img)), 0);
    }
}
