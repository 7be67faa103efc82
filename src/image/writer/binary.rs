use std::path::{Path, PathBuf};

use ::image::{Rgb, RgbImage};

use super::super::{Image, ImageWriter};
use crate::image::reader::binary::BINARY_MAX_VALUE;
use crate::Error;

/// Saves an image in the format implied by the file extension. Channels are
/// rescaled to 8 bit when the image uses a different max value.
pub struct BinaryImageWriter {
    path: PathBuf,
}

impl BinaryImageWriter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_owned(),
        }
    }
}

fn scale_to_8_bit(channel: u16, max_value: u16) -> u8 {
    let scaled = u32::from(channel) * u32::from(BINARY_MAX_VALUE) / u32::from(max_value);
    scaled as u8
}

pub(crate) fn to_rgb_image(image: &Image) -> RgbImage {
    let max_value = image.max_value();
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let channels = image.dot(x, y).channels();
        Rgb(channels.map(|channel| scale_to_8_bit(channel, max_value)))
    })
}

impl ImageWriter for BinaryImageWriter {
    fn write_image(&mut self, image: &Image) -> crate::Result<()> {
        to_rgb_image(image)
            .save(&self.path)
            .map_err(|e| Error::BinaryImageCodecFailed(self.path.display().to_string(), e))
    }
}

#[cfg(test)]
mod test {
    use super::{scale_to_8_bit, to_rgb_image};
    use crate::color::Pixel;
    use crate::image::Image;

    #[test]
    fn keep_8_bit_values() {
        assert_eq!(scale_to_8_bit(0, 255), 0);
        assert_eq!(scale_to_8_bit(128, 255), 128);
        assert_eq!(scale_to_8_bit(255, 255), 255);
    }

    #[test]
    fn rescale_wider_channels() {
        assert_eq!(scale_to_8_bit(1023, 1023), 255);
        assert_eq!(scale_to_8_bit(512, 1023), 127);
        assert_eq!(scale_to_8_bit(1, 1), 255);
    }

    #[test]
    fn convert_to_rgb_buffer() {
        let image = Image::new(2, 1, 255, vec![Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)]).unwrap();
        let buffer = to_rgb_image(&image);
        assert_eq!(buffer.dimensions(), (2, 1));
        assert_eq!(buffer.get_pixel(1, 0).0, [4, 5, 6]);
    }
}
