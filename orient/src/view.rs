use image::GrayImage;

use crate::error::OrientError;

/// Borrowed single-channel 8-bit pixels with an explicit row pitch.
///
/// `stride` may exceed `width`, which is what a crop into a larger parent looks like:
/// the view keeps the parent's pitch and only narrows the visible window.
#[derive(Clone, Copy, Debug)]
pub struct GrayView<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
    stride: u32,
}

impl<'a> GrayView<'a> {
    pub fn new(pixels: &'a [u8], width: u32, height: u32, stride: u32) -> Result<Self, OrientError> {
        if !geometry_fits(pixels.len(), width, height, stride) {
            return Err(OrientError::InvalidGeometry {
                width,
                height,
                stride,
                len: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    pub fn from_image(img: &'a GrayImage) -> Self {
        Self {
            pixels: img.as_raw(),
            width: img.width(),
            height: img.height(),
            stride: img.width(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Narrow the view to `w x h` pixels at `(x, y)`. Returns `None` when the window
    /// leaves the view or is empty.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Option<GrayView<'a>> {
        if w == 0 || h == 0 {
            return None;
        }
        let right = x.checked_add(w)?;
        let bottom = y.checked_add(h)?;
        if right > self.width || bottom > self.height {
            return None;
        }
        let offset = y as usize * self.stride as usize + x as usize;
        Some(GrayView {
            pixels: &self.pixels[offset..],
            width: w,
            height: h,
            stride: self.stride,
        })
    }

    /// Packed owned copy of the visible window.
    pub fn to_image(&self) -> GrayImage {
        let mut raw = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            raw.extend_from_slice(self.row(y));
        }
        GrayImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }
}

fn geometry_fits(len: usize, width: u32, height: u32, stride: u32) -> bool {
    if width == 0 || height == 0 || stride < width {
        return false;
    }
    let needed = (height as usize - 1) * stride as usize + width as usize;
    len >= needed
}
