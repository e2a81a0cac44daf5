pub mod error;
pub mod jpeg;
pub mod perplexity;
pub mod rotation;
pub mod view;

pub use error::OrientError;
pub use jpeg::save_jpeg;
pub use perplexity::{PerplexityScorer, perplexity};
pub use rotation::{Orientation, rotate};
pub use view::GrayView;
