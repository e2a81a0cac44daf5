use rand::Rng;

use crate::fonts::FontWeight;

pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Digits appear three times so numbers dominate the punctuation.
pub const DIGITS: &str = "012345678901234567890123456789.,-_+()";

pub const LINES: usize = 6;
pub const WORD_LEN: usize = 20;

/// Everything random about one render.
///
/// Draw order is fixed and part of the dataset format: font, weight, x, y, size,
/// line spacing, then one word per line (alphabet pick, then its characters).
/// Reordering any of these changes every image produced from a given seed.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParameters {
    pub font_index: usize,
    pub weight: FontWeight,
    /// Horizontal start, canvas units, in `[-10, 0)`.
    pub x: f32,
    /// Vertical start of the first baseline below the bottom edge, canvas units, in `[-30, 0)`.
    pub y: f32,
    /// Font size in points, in `[40, 80)`.
    pub size: f32,
    /// Baseline-to-baseline distance, canvas units.
    pub line_spacing: f32,
    pub words: Vec<String>,
}

impl GenerationParameters {
    pub fn draw<R: Rng>(rng: &mut R, font_count: usize, lines: usize, word_len: usize) -> Self {
        let font_index = rng.random_range(0..font_count.max(1));
        let weight = FontWeight::from_draw(rng.random::<f64>());
        let x = -10.0 + rng.random::<f64>() * 10.0;
        let y = -30.0 + rng.random::<f64>() * 30.0;
        let size = 40.0 + rng.random::<f64>() * 40.0;
        let line_spacing = size * 0.4 + size * rng.random::<f64>() * 0.3;
        let words = (0..lines).map(|_| random_word(rng, word_len)).collect();

        Self {
            font_index,
            weight,
            x: x as f32,
            y: y as f32,
            size: size as f32,
            line_spacing: line_spacing as f32,
            words,
        }
    }
}

/// Half the words are numbers and punctuation, the rest mixed-case letters.
pub fn random_word<R: Rng>(rng: &mut R, len: usize) -> String {
    let alphabet: Vec<char> = if rng.random_range(0..10) <= 4 {
        DIGITS.chars().collect()
    } else {
        LETTERS.chars().collect()
    };
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn same_seed_same_draw() {
        let a = GenerationParameters::draw(&mut Xoshiro256PlusPlus::seed_from_u64(7), 3, LINES, WORD_LEN);
        let b = GenerationParameters::draw(&mut Xoshiro256PlusPlus::seed_from_u64(7), 3, LINES, WORD_LEN);
        assert_eq!(a, b);
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for _ in 0..500 {
            let p = GenerationParameters::draw(&mut rng, 4, LINES, WORD_LEN);
            assert!(p.font_index < 4);
            assert!((-10.0..0.0).contains(&p.x));
            assert!((-30.0..0.0).contains(&p.y));
            assert!((40.0..80.0).contains(&p.size));
            assert!(p.line_spacing >= p.size * 0.4 - 1e-3);
            assert!(p.line_spacing <= p.size * 0.7 + 1e-3);
            assert_eq!(p.words.len(), LINES);
            assert!(p.words.iter().all(|w| w.chars().count() == WORD_LEN));
        }
    }

    #[test]
    fn words_use_a_single_alphabet() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
        let (mut numeric, mut alpha) = (0, 0);
        for _ in 0..400 {
            let w = random_word(&mut rng, WORD_LEN);
            if w.chars().all(|c| DIGITS.contains(c)) {
                numeric += 1;
            } else {
                assert!(w.chars().all(|c| c.is_ascii_alphabetic()));
                alpha += 1;
            }
        }
        // roughly even split
        assert!(numeric > 120 && alpha > 120, "{numeric} / {alpha}");
    }

    #[test]
    fn weight_mix_favours_heavy_faces() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let heavy = (0..1000)
            .map(|_| GenerationParameters::draw(&mut rng, 1, 1, 1).weight)
            .filter(|w| matches!(w, FontWeight::Bold | FontWeight::ExtraBold))
            .count();
        assert!(heavy > 650 && heavy < 850, "{heavy}");
    }
}
