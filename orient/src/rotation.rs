use std::fmt;

use image::{GenericImageView, ImageBuffer, Pixel, imageops};

use crate::error::OrientError;

/// Page orientation class. The discriminant order is the class index written into
/// dataset directory names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Deg0,
        Orientation::Deg90,
        Orientation::Deg180,
        Orientation::Deg270,
    ];

    pub fn class_index(self) -> usize {
        self as usize
    }

    pub fn degrees(self) -> u32 {
        self.class_index() as u32 * 90
    }

    pub fn from_degrees(degrees: u32) -> Result<Self, OrientError> {
        match degrees {
            0 => Ok(Orientation::Deg0),
            90 => Ok(Orientation::Deg90),
            180 => Ok(Orientation::Deg180),
            270 => Ok(Orientation::Deg270),
            other => Err(OrientError::UnsupportedAngle(other)),
        }
    }

    pub fn from_class_index(index: usize) -> Result<Self, OrientError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(OrientError::UnknownClass(index))
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Rotate clockwise by a quarter-turn multiple. Lossless and format preserving;
/// `Deg0` returns a pixel-identical copy.
pub fn rotate<I>(img: &I, orientation: Orientation) -> ImageBuffer<I::Pixel, Vec<<I::Pixel as Pixel>::Subpixel>>
where
    I: GenericImageView,
    I::Pixel: 'static,
{
    match orientation {
        Orientation::Deg0 => {
            let (w, h) = img.dimensions();
            ImageBuffer::from_fn(w, h, |x, y| img.get_pixel(x, y))
        }
        Orientation::Deg90 => imageops::rotate90(img),
        Orientation::Deg180 => imageops::rotate180(img),
        Orientation::Deg270 => imageops::rotate270(img),
    }
}
