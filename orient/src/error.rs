use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrientError {
    #[error("invalid pixel geometry: {width}x{height}, stride {stride}, buffer of {len} bytes")]
    InvalidGeometry {
        width: u32,
        height: u32,
        stride: u32,
        len: usize,
    },
    #[error("unsupported rotation angle {0}, expected one of 0, 90, 180, 270")]
    UnsupportedAngle(u32),
    #[error("unknown orientation class {0}")]
    UnknownClass(usize),
}
