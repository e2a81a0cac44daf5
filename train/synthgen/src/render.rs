use ab_glyph::{Font, PxScale, ScaleFont};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_text_mut},
    rect::Rect,
};

use crate::{error::RenderError, fonts::FontSet, params::GenerationParameters};

/// Canvas units are millimetres; font sizes are points.
pub const PT_TO_UNITS: f32 = 25.4 / 72.0;

pub struct CanvasCfg {
    /// Side of the square canvas in units.
    pub units: f32,
    /// Raster pixels per unit.
    pub density: f32,
}

impl Default for CanvasCfg {
    fn default() -> Self {
        Self {
            units: 32.0,
            density: 4.0,
        }
    }
}

impl CanvasCfg {
    pub fn side_px(&self) -> u32 {
        (self.units * self.density).round().max(0.0) as u32
    }
}

/// Turns one set of generation parameters into pixels. Implementations report bad
/// geometry as an error instead of panicking so that a single render cannot take down
/// a dataset run.
pub trait Rasterizer {
    fn family_count(&self) -> usize;
    fn family_name(&self, index: usize) -> Option<&str>;
    fn rasterize(
        &self,
        params: &GenerationParameters,
        canvas: &CanvasCfg,
    ) -> Result<DynamicImage, RenderError>;
}

/// Pixel positions of the text lines. The parameters describe a y-up canvas with the
/// first baseline below the bottom edge and later lines stacked upwards.
#[derive(Debug, PartialEq)]
pub struct LineLayout {
    pub side: u32,
    pub x: i32,
    pub font_px: f32,
    pub baselines: Vec<f32>,
}

pub fn layout(params: &GenerationParameters, canvas: &CanvasCfg) -> Result<LineLayout, RenderError> {
    let side = canvas.side_px();
    if side == 0 || !canvas.density.is_finite() {
        return Err(RenderError::InvalidGeometry(format!(
            "canvas of {} units at {} px/unit",
            canvas.units, canvas.density
        )));
    }
    let font_px = params.size * PT_TO_UNITS * canvas.density;
    if !font_px.is_finite() || font_px <= 0.0 {
        return Err(RenderError::InvalidGeometry(format!("font size {}", params.size)));
    }
    if !params.line_spacing.is_finite() || !params.x.is_finite() || !params.y.is_finite() {
        return Err(RenderError::InvalidGeometry("non-finite text position".into()));
    }

    let baselines = (0..params.words.len())
        .map(|i| (canvas.units - (params.y + i as f32 * params.line_spacing)) * canvas.density)
        .collect();
    Ok(LineLayout {
        side,
        x: (params.x * canvas.density).round() as i32,
        font_px,
        baselines,
    })
}

/// Draws real glyphs from a [`FontSet`], black on white.
pub struct GlyphRasterizer<'a> {
    fonts: &'a FontSet,
}

impl<'a> GlyphRasterizer<'a> {
    pub fn new(fonts: &'a FontSet) -> Self {
        Self { fonts }
    }
}

impl Rasterizer for GlyphRasterizer<'_> {
    fn family_count(&self) -> usize {
        self.fonts.family_count()
    }

    fn family_name(&self, index: usize) -> Option<&str> {
        self.fonts.family(index).map(|f| f.name())
    }

    fn rasterize(
        &self,
        params: &GenerationParameters,
        canvas: &CanvasCfg,
    ) -> Result<DynamicImage, RenderError> {
        let lines = layout(params, canvas)?;
        let family = self.fonts.family(params.font_index).ok_or_else(|| {
            RenderError::InvalidGeometry(format!("font index {} out of range", params.font_index))
        })?;
        let face = family.face(params.weight).ok_or_else(|| {
            RenderError::InvalidGeometry(format!("family {} has no faces", family.name()))
        })?;

        let scale = PxScale::from(lines.font_px);
        let ascent = face.font.as_scaled(scale).ascent();
        let mut img = RgbImage::from_pixel(lines.side, lines.side, Rgb([255, 255, 255]));
        for (word, baseline) in params.words.iter().zip(&lines.baselines) {
            let top = (baseline - ascent).round() as i32;
            for pass in 0..=face.faux_bold {
                draw_text_mut(
                    &mut img,
                    Rgb([0, 0, 0]),
                    lines.x + pass as i32,
                    top,
                    scale,
                    face.font,
                    word,
                );
            }
        }
        Ok(DynamicImage::ImageRgb8(img))
    }
}

/// Font-free stand-in that draws each character as a vertical stroke with the same
/// layout a real font would get. Deterministic, and handy where no font files exist.
pub struct StrokeRasterizer;

impl StrokeRasterizer {
    pub const FAMILY: &'static str = "strokes";
}

impl Rasterizer for StrokeRasterizer {
    fn family_count(&self) -> usize {
        1
    }

    fn family_name(&self, index: usize) -> Option<&str> {
        (index == 0).then_some(Self::FAMILY)
    }

    fn rasterize(
        &self,
        params: &GenerationParameters,
        canvas: &CanvasCfg,
    ) -> Result<DynamicImage, RenderError> {
        let lines = layout(params, canvas)?;
        let advance = lines.font_px * 0.55;
        let stroke_w = (lines.font_px * (0.08 + 0.03 * params.weight as u32 as f32))
            .round()
            .max(1.0) as u32;

        let mut img = GrayImage::from_pixel(lines.side, lines.side, Luma([255]));
        for (word, baseline) in params.words.iter().zip(&lines.baselines) {
            for (j, ch) in word.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let tall = ch.is_ascii_uppercase() || ch.is_ascii_digit() || "()".contains(ch);
                let h = (lines.font_px * if tall { 0.7 } else { 0.45 }).round().max(1.0) as u32;
                let x = lines.x + (j as f32 * advance).round() as i32;
                let y = (baseline - h as f32).round() as i32;
                draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(stroke_w, h), Luma([0]));
            }
        }
        Ok(DynamicImage::ImageLuma8(img))
    }
}
