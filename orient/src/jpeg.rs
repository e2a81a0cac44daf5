use std::{fs::File, io::BufWriter, path::Path};

use image::{ImageBuffer, ImageResult, Pixel, PixelWithColorType, codecs::jpeg::JpegEncoder};

pub const DEFAULT_QUALITY: u8 = 95;

/// Encode `img` as a baseline JPEG at `path`.
pub fn save_jpeg<P>(path: &Path, img: &ImageBuffer<P, Vec<u8>>, quality: u8) -> ImageResult<()>
where
    P: Pixel<Subpixel = u8> + PixelWithColorType,
{
    let mut out = BufWriter::new(File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    img.write_with_encoder(encoder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn written_file_decodes_with_same_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("001.jpg");
        let img = GrayImage::from_fn(32, 32, |x, _| Luma([if x % 4 < 2 { 0 } else { 255 }]));

        save_jpeg(&path, &img, DEFAULT_QUALITY).unwrap();

        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (32, 32));
    }
}
