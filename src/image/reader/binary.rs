use std::path::{Path, PathBuf};

use super::super::{Image, ImageReader};
use crate::color::Pixel;
use crate::Error;

/// Max value of every image decoded from an 8 bit binary format.
pub const BINARY_MAX_VALUE: u16 = u8::MAX as u16;

/// Loads compressed formats (PNG, JPEG, BMP, ...) through the `image` crate.
/// Only the RGB triples are kept.
pub struct BinaryImageReader {
    path: PathBuf,
}

impl BinaryImageReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_owned(),
        }
    }
}

impl ImageReader for BinaryImageReader {
    fn read_image(&mut self) -> crate::Result<Image> {
        let decoded = ::image::open(&self.path)
            .map_err(|e| Error::BinaryImageCodecFailed(self.path.display().to_string(), e))?
            .into_rgb8();
        let (width, height) = decoded.dimensions();
        let dots = decoded
            .pixels()
            .map(|rgb| {
                let [red, green, blue] = rgb.0;
                Pixel::new(red.into(), green.into(), blue.into())
            })
            .collect();
        Image::new(width, height, BINARY_MAX_VALUE, dots)
    }
}
