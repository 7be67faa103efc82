//! Floyd-Steinberg error diffusion down to two luma levels.

use super::Image;
use crate::color::{GreyscaleComponent, Pixel};
use crate::logger::log_dimensions;

/// Neighbour offsets `(dx, dy)` with their share of the quantization error.
const ERROR_DIFFUSION_WEIGHTS: [(i64, i64, f64); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Working buffer of luma levels that receives the diffused error.
struct LumaPlane {
    width: usize,
    height: usize,
    max_value: f64,
    levels: Vec<f64>,
}

impl LumaPlane {
    fn from_image(image: &Image) -> Self {
        let levels = image
            .greyscale(GreyscaleComponent::Luma)
            .dots()
            .iter()
            .map(|dot| f64::from(dot.red()))
            .collect();
        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            max_value: f64::from(image.max_value()),
            levels,
        }
    }

    fn midpoint(&self) -> f64 {
        (self.max_value + 1.0) / 2.0
    }

    fn quantize(&mut self, column_index: usize, row_index: usize) -> f64 {
        let index = column_index + row_index * self.width;
        let old_level = self.levels[index];
        let new_level = if old_level < self.midpoint() {
            0.0
        } else {
            self.max_value
        };
        self.levels[index] = new_level;
        old_level - new_level
    }

    fn diffuse(&mut self, column_index: usize, row_index: usize, error: f64) {
        for (dx, dy, weight) in ERROR_DIFFUSION_WEIGHTS {
            let x = column_index as i64 + dx;
            let y = row_index as i64 + dy;
            if x < 0 || x >= self.width as i64 || y >= self.height as i64 {
                continue;
            }
            let index = x as usize + y as usize * self.width;
            self.levels[index] = (self.levels[index] + error * weight).clamp(0.0, self.max_value);
        }
    }
}

/// Reduces an image to black and white. Pixels are visited strictly in
/// row-major order and every diffused error is seen by the pixels after it.
pub fn dither(image: &Image) -> Image {
    log_dimensions("dither", image.width(), image.height(), image.max_value());
    let mut plane = LumaPlane::from_image(image);
    for row_index in 0..plane.height {
        for column_index in 0..plane.width {
            let error = plane.quantize(column_index, row_index);
            plane.diffuse(column_index, row_index, error);
        }
    }
    let dots = plane
        .levels
        .iter()
        .map(|&level| Pixel::grey(level as u16))
        .collect();
    Image::from_valid_parts(image.width(), image.height(), image.max_value(), dots)
}
