use thiserror::Error;

#[derive(Debug, Error)]
pub enum TileError {
    #[error("tile size must be positive")]
    ZeroTileSize,

    #[error("{width}x{height} image is too small for {tile_size}px tiles")]
    ImageTooSmall {
        width: u32,
        height: u32,
        tile_size: u32,
    },

    #[error("insufficient tiles: requested {requested}, only {available} candidates")]
    InsufficientTiles { requested: usize, available: usize },

    #[error("tile output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("tile encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
