pub mod dataset;
pub mod error;
pub mod fonts;
pub mod generator;
pub mod io;
pub mod params;
pub mod record;
pub mod render;

pub use error::{GenerateError, RenderError};
pub use fonts::{FontSet, FontWeight};
pub use generator::{Attempt, GeneratorConfig, Sample, SyntheticImageGenerator};
pub use render::{CanvasCfg, GlyphRasterizer, Rasterizer, StrokeRasterizer};
