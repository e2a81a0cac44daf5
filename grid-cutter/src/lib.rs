pub mod error;
pub mod geom;
pub mod output;
pub mod sampler;

pub use error::TileError;
pub use geom::TileRect;
pub use sampler::{SampledTile, SamplerConfig, TileSampler, TileSet};
