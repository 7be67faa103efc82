use crate::color::{ColorMatrix, GreyscaleComponent, Pixel};
use crate::error::Error;
use crate::logger::log_dimensions;

pub mod convolution;
pub mod dither;
pub mod reader;
pub mod transformer;
pub mod writer;

pub trait ImageReader {
    fn read_image(&mut self) -> crate::Result<Image>;
}

pub trait ImageWriter {
    fn write_image(&mut self, image: &Image) -> crate::Result<()>;
}

/// A row-major grid of pixels whose channels all lie in `0..=max_value`.
///
/// Every operation borrows the image and returns a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    max_value: u16,
    dots: Vec<Pixel>,
}

impl Image {
    pub fn new(width: u32, height: u32, max_value: u16, dots: Vec<Pixel>) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageDimensions(width, height));
        }
        if max_value == 0 {
            return Err(Error::InvalidMaxValue);
        }
        let expected_number_of_dots = width as usize * height as usize;
        if dots.len() != expected_number_of_dots {
            return Err(Error::PixelCountDoesNotMatchDimensions(
                expected_number_of_dots,
                dots.len(),
            ));
        }
        if let Some(dot) = dots.iter().find(|dot| !dot.fits_into(max_value)) {
            return Err(Error::ChannelValueOutOfRange(
                i64::from(dot.value()),
                max_value,
            ));
        }
        Ok(Self::from_valid_parts(width, height, max_value, dots))
    }

    /// Callers guarantee the invariants checked by [`Image::new`].
    pub(crate) fn from_valid_parts(width: u32, height: u32, max_value: u16, dots: Vec<Pixel>) -> Self {
        Self {
            width,
            height,
            max_value,
            dots,
        }
    }

    pub fn decode(bytes: &[u8]) -> crate::Result<Self> {
        reader::ppm::PPMImageReader::new(bytes).read_image()
    }

    pub fn encode(&self) -> crate::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        writer::ppm::PPMImageWriter::new(&mut buffer).write_image(self)?;
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    pub fn dots(&self) -> &[Pixel] {
        &self.dots
    }

    /// # Panics
    ///
    /// If `column_index >= width` or `row_index >= height`.
    pub fn dot(&self, column_index: u32, row_index: u32) -> Pixel {
        assert!(
            column_index < self.width && row_index < self.height,
            "dot ({}, {}) is outside of the {}x{} image",
            column_index,
            row_index,
            self.width,
            self.height
        );
        self.dots[self.index_of(column_index, row_index)]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.dots.chunks_exact(self.width as usize)
    }

    pub fn is_greyscale(&self) -> bool {
        self.dots.iter().all(Pixel::is_greyscale)
    }

    fn index_of(&self, column_index: u32, row_index: u32) -> usize {
        column_index as usize + row_index as usize * self.width as usize
    }

    fn map_dots<F>(&self, f: F) -> Self
    where
        F: Fn(&Pixel) -> Pixel,
    {
        let dots = self.dots.iter().map(f).collect();
        Self::from_valid_parts(self.width, self.height, self.max_value, dots)
    }

    pub fn brighten(&self, delta: i32) -> Self {
        log_dimensions("brighten", self.width, self.height, self.max_value);
        let max_value = i64::from(self.max_value);
        let shift = |channel: u16| (i64::from(channel) + i64::from(delta)).clamp(0, max_value) as u16;
        self.map_dots(|dot| Pixel::new(shift(dot.red()), shift(dot.green()), shift(dot.blue())))
    }

    pub fn flip_horizontal(&self) -> Self {
        log_dimensions("horizontal flip", self.width, self.height, self.max_value);
        let dots = self
            .rows()
            .flat_map(|row| row.iter().rev().copied())
            .collect();
        Self::from_valid_parts(self.width, self.height, self.max_value, dots)
    }

    pub fn flip_vertical(&self) -> Self {
        log_dimensions("vertical flip", self.width, self.height, self.max_value);
        let dots = self
            .dots
            .rchunks_exact(self.width as usize)
            .flatten()
            .copied()
            .collect();
        Self::from_valid_parts(self.width, self.height, self.max_value, dots)
    }

    pub fn greyscale(&self, component: GreyscaleComponent) -> Self {
        log::debug!("greyscale by {} component", component);
        let max_value = self.max_value;
        self.map_dots(|dot| Pixel::grey(component.extract(dot, max_value)))
    }

    /// Returns the red, green and blue channel as greyscale images.
    pub fn split(&self) -> (Self, Self, Self) {
        log_dimensions("channel split", self.width, self.height, self.max_value);
        (
            self.greyscale(GreyscaleComponent::Red),
            self.greyscale(GreyscaleComponent::Green),
            self.greyscale(GreyscaleComponent::Blue),
        )
    }

    /// Uses `self` as the red channel source. All sources are validated
    /// before the first pixel of the result is built.
    pub fn combine(&self, green: &Image, blue: &Image) -> crate::Result<Self> {
        log_dimensions("channel combine", self.width, self.height, self.max_value);
        Self::check_channel_sources_have_same_shape(self, green, blue)?;
        Self::check_channel_source_is_greyscale(self, "red")?;
        Self::check_channel_source_is_greyscale(green, "green")?;
        Self::check_channel_source_is_greyscale(blue, "blue")?;
        let dots = self
            .dots
            .iter()
            .zip(green.dots.iter().zip(blue.dots.iter()))
            .map(|(red, (green, blue))| Pixel::new(red.red(), green.green(), blue.blue()))
            .collect();
        Ok(Self::from_valid_parts(
            self.width,
            self.height,
            self.max_value,
            dots,
        ))
    }

    pub fn convolve(&self, kernel: &convolution::Kernel) -> Self {
        kernel.convolve(self)
    }

    pub fn transform_color(&self, matrix: &ColorMatrix) -> Self {
        transformer::ColorTransformer::new(matrix).transform(self)
    }

    pub fn dither(&self) -> Self {
        dither::dither(self)
    }

    fn check_channel_sources_have_same_shape(
        red: &Image,
        green: &Image,
        blue: &Image,
    ) -> crate::Result<()> {
        let same_dimensions = |other: &Image| red.width == other.width && red.height == other.height;
        if !same_dimensions(green) || !same_dimensions(blue) {
            return Err(Error::MismatchOfDimensionsBetweenChannelSources);
        }
        if red.max_value != green.max_value || red.max_value != blue.max_value {
            return Err(Error::MismatchOfMaxValueBetweenChannelSources);
        }
        Ok(())
    }

    fn check_channel_source_is_greyscale(source: &Image, channel_name: &'static str) -> crate::Result<()> {
        if !source.is_greyscale() {
            return Err(Error::ChannelSourceIsNotGreyscale(channel_name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Image;
    use crate::color::{GreyscaleComponent, Pixel};
    use crate::error::{Error, ErrorKind};

    #[test]
    #[should_panic(expected = "outside of the 2x2 image")]
    fn dot_outside_of_row_panics() {
        two_by_two_image().dot(2, 0);
    }

    fn two_by_two_image() -> Image {
        Image::new(
            2,
            2,
            255,
            vec![
                Pixel::new(10, 20, 30),
                Pixel::new(200, 210, 220),
                Pixel::new(0, 0, 0),
                Pixel::new(255, 255, 255),
            ],
        )
        .unwrap()
    }

    fn three_by_two_image() -> Image {
        Image::new(
            3,
            2,
            255,
            vec![
                Pixel::new(1, 2, 3),
                Pixel::new(4, 5, 6),
                Pixel::new(7, 8, 9),
                Pixel::new(10, 11, 12),
                Pixel::new(13, 14, 15),
                Pixel::new(16, 17, 18),
            ],
        )
        .unwrap()
    }

    fn assert_in_range(image: &Image) {
        for dot in image.dots() {
            assert!(
                dot.value() <= image.max_value(),
                "Pixel {:?} exceeds max value {}",
                dot,
                image.max_value()
            );
        }
    }

    #[test]
    fn reject_invalid_construction() {
        assert!(matches!(
            Image::new(0, 1, 255, vec![]),
            Err(Error::InvalidImageDimensions(0, 1))
        ));
        assert!(matches!(
            Image::new(1, 1, 0, vec![Pixel::grey(0)]),
            Err(Error::InvalidMaxValue)
        ));
        assert!(matches!(
            Image::new(2, 1, 255, vec![Pixel::grey(0)]),
            Err(Error::PixelCountDoesNotMatchDimensions(2, 1))
        ));
        assert!(matches!(
            Image::new(1, 1, 15, vec![Pixel::new(0, 16, 0)]),
            Err(Error::ChannelValueOutOfRange(16, 15))
        ));
    }

    #[test]
    fn brighten_clamps_each_channel() {
        let brightened = two_by_two_image().brighten(50);
        assert_eq!(
            brightened.dots(),
            &[
                Pixel::new(60, 70, 80),
                Pixel::new(250, 255, 255),
                Pixel::new(50, 50, 50),
                Pixel::new(255, 255, 255),
            ]
        );
    }

    #[test]
    fn darken_clamps_at_zero() {
        let darkened = two_by_two_image().brighten(-25);
        assert_eq!(darkened.dot(0, 0), Pixel::new(0, 0, 5));
        assert_eq!(darkened.dot(1, 1), Pixel::new(230, 230, 230));
        assert_in_range(&darkened);
    }

    #[test]
    fn brighten_with_extreme_delta_saturates() {
        let image = two_by_two_image();
        assert!(image.brighten(i32::MAX).dots().iter().all(|dot| *dot == Pixel::grey(255)));
        assert!(image.brighten(i32::MIN).dots().iter().all(|dot| *dot == Pixel::grey(0)));
    }

    #[test]
    fn brighten_is_reversible_without_clamping() {
        let image = three_by_two_image();
        assert_eq!(image.brighten(40).brighten(-40), image);
    }

    #[test]
    fn brighten_does_not_touch_source() {
        let image = two_by_two_image();
        let copy = image.clone();
        let _ = image.brighten(100);
        assert_eq!(image, copy);
    }

    #[test]
    fn flip_horizontal_reverses_rows() {
        let flipped = three_by_two_image().flip_horizontal();
        assert_eq!(flipped.dot(0, 0), Pixel::new(7, 8, 9));
        assert_eq!(flipped.dot(2, 0), Pixel::new(1, 2, 3));
        assert_eq!(flipped.dot(0, 1), Pixel::new(16, 17, 18));
        assert_eq!(flipped.width(), 3);
        assert_eq!(flipped.height(), 2);
    }

    #[test]
    fn flip_vertical_reverses_row_order() {
        let flipped = three_by_two_image().flip_vertical();
        assert_eq!(flipped.dot(0, 0), Pixel::new(10, 11, 12));
        assert_eq!(flipped.dot(2, 1), Pixel::new(7, 8, 9));
    }

    #[test]
    fn flips_are_involutions() {
        let image = three_by_two_image();
        assert_eq!(image.flip_horizontal().flip_horizontal(), image);
        assert_eq!(image.flip_vertical().flip_vertical(), image);
    }

    #[test]
    fn greyscale_components_produce_grey_pixels() {
        let image = two_by_two_image();
        for component in [
            GreyscaleComponent::Red,
            GreyscaleComponent::Green,
            GreyscaleComponent::Blue,
            GreyscaleComponent::Value,
            GreyscaleComponent::Intensity,
            GreyscaleComponent::Luma,
        ] {
            let grey = image.greyscale(component);
            assert!(grey.is_greyscale(), "{} result is not grey", component);
            assert_in_range(&grey);
        }
    }

    #[test]
    fn greyscale_by_value_and_intensity() {
        let image = two_by_two_image();
        assert_eq!(
            image.greyscale(GreyscaleComponent::Value).dot(0, 0),
            Pixel::grey(30)
        );
        assert_eq!(
            image.greyscale(GreyscaleComponent::Intensity).dot(1, 0),
            Pixel::grey(210)
        );
        assert_eq!(
            image.greyscale(GreyscaleComponent::Luma).dot(1, 1),
            Pixel::grey(255)
        );
    }

    #[test]
    fn split_extracts_each_channel() {
        let (red, green, blue) = two_by_two_image().split();
        assert_eq!(red.dot(0, 0), Pixel::grey(10));
        assert_eq!(green.dot(0, 0), Pixel::grey(20));
        assert_eq!(blue.dot(0, 0), Pixel::grey(30));
    }

    #[test]
    fn split_then_combine_restores_image() {
        let image = two_by_two_image();
        let (red, green, blue) = image.split();
        assert_eq!(red.combine(&green, &blue).unwrap(), image);
    }

    #[test]
    fn combine_of_grey_image_with_itself_is_identity() {
        let grey = two_by_two_image().greyscale(GreyscaleComponent::Luma);
        assert_eq!(grey.combine(&grey, &grey).unwrap(), grey);
    }

    #[test]
    fn combine_rejects_mismatched_dimensions() {
        let (red, green, _) = two_by_two_image().split();
        let (_, _, blue) = three_by_two_image().split();
        let error = red.combine(&green, &blue).unwrap_err();
        assert!(matches!(error, Error::MismatchOfDimensionsBetweenChannelSources));
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn combine_rejects_colored_source() {
        let image = two_by_two_image();
        let (red, _, blue) = image.split();
        match red.combine(&image, &blue) {
            Err(Error::ChannelSourceIsNotGreyscale(channel)) => assert_eq!(channel, "green"),
            _ => panic!("Colored channel source was not detected"),
        }
    }

    #[test]
    fn combine_rejects_mismatched_max_value() {
        let (red, green, _) = two_by_two_image().split();
        let blue = Image::new(2, 2, 1023, vec![Pixel::grey(0); 4]).unwrap();
        assert!(matches!(
            red.combine(&green, &blue),
            Err(Error::MismatchOfMaxValueBetweenChannelSources)
        ));
    }
}
