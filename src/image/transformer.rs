use super::Image;
use crate::color::ColorMatrix;
use crate::logger::log_dimensions;

pub struct ColorTransformer<'a> {
    matrix: &'a ColorMatrix,
}

impl<'a> ColorTransformer<'a> {
    pub fn new(matrix: &'a ColorMatrix) -> Self {
        ColorTransformer { matrix }
    }

    pub fn transform(&self, image: &Image) -> Image {
        log_dimensions("color transform", image.width(), image.height(), image.max_value());
        let max_value = image.max_value();
        let dots = image
            .dots()
            .iter()
            .map(|dot| self.matrix.apply(dot, max_value))
            .collect();
        Image::from_valid_parts(image.width(), image.height(), max_value, dots)
    }
}
