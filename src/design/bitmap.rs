//! Design bitmap codec
//!
//! Design files are PNG images drawn as black ink on a transparent canvas.
//! Only the alpha channel carries the design; decoding keeps alpha and encoding
//! writes it back as black pixels.

use crate::design::error::{DesignError, DesignResult};
use image::{ImageFormat, ImageReader, Rgba, RgbaImage};
use std::path::Path;

/// Row-major alpha grid of one design file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignBitmap {
    pub width: u32,
    pub height: u32,
    alpha: Vec<u8>,
}

impl DesignBitmap {
    /// Fully transparent bitmap
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; (width as usize) * (height as usize)],
        }
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.alpha[(y as usize) * (self.width as usize) + (x as usize)]
    }

    pub fn set_alpha(&mut self, x: u32, y: u32, value: u8) {
        let index = (y as usize) * (self.width as usize) + (x as usize);
        self.alpha[index] = value;
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y as usize) * (self.width as usize);
        &self.alpha[start..start + self.width as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks() panics on zero; an empty bitmap has no rows anyway
        self.alpha.chunks(self.width.max(1) as usize)
    }

    fn from_rgba(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            alpha: image.pixels().map(|pixel| pixel.0[3]).collect(),
        }
    }

    fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba([0, 0, 0, self.alpha(x, y)])
        })
    }
}

/// Decoding and encoding of design files
pub trait BitmapCodec {
    fn decode(&self, path: &Path) -> DesignResult<DesignBitmap>;
    fn encode(&self, bitmap: &DesignBitmap, path: &Path) -> DesignResult<()>;
}

/// PNG codec backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl BitmapCodec for PngCodec {
    fn decode(&self, path: &Path) -> DesignResult<DesignBitmap> {
        let mut reader = ImageReader::open(path).map_err(|e| DesignError::io(path, e))?;
        reader.set_format(ImageFormat::Png);
        let image = reader.decode().map_err(|source| DesignError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(DesignBitmap::from_rgba(&image.to_rgba8()))
    }

    fn encode(&self, bitmap: &DesignBitmap, path: &Path) -> DesignResult<()> {
        bitmap
            .to_rgba()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| DesignError::Image {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rows_and_alpha() {
        let mut bitmap = DesignBitmap::empty(2, 2);
        bitmap.set_alpha(1, 0, 255);
        bitmap.set_alpha(0, 1, 128);
        assert_eq!(bitmap.alpha(1, 0), 255);
        assert_eq!(bitmap.row(1), &[128, 0]);
        assert_eq!(bitmap.rows().count(), 2);
    }

    #[test]
    fn test_png_codec_keeps_alpha() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("0041.png");

        let mut bitmap = DesignBitmap::empty(6, 12);
        bitmap.set_alpha(2, 3, 255);
        bitmap.set_alpha(3, 4, 90);

        PngCodec.encode(&bitmap, &path).unwrap();
        let decoded = PngCodec.decode(&path).unwrap();
        assert_eq!(decoded, bitmap);
    }

    #[test]
    fn test_png_codec_drops_color() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("0041.png");
        let image = RgbaImage::from_pixel(2, 2, Rgba([200, 10, 10, 255]));
        image.save_with_format(&path, ImageFormat::Png).unwrap();

        let decoded = PngCodec.decode(&path).unwrap();
        assert_eq!(decoded.rows().count(), 2);
        assert!(decoded.rows().all(|row| row == [255, 255]));
    }

    #[test]
    fn test_decode_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = PngCodec.decode(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(DesignError::Io { .. })));
    }
}
