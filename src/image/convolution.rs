//! Square kernel convolution with implicit zero padding.

use super::Image;
use crate::color::{clamp_channel, Pixel};
use crate::error::Error;
use crate::logger::log_dimensions;

/// A borrowed odd sized square kernel in row-major order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel<'a> {
    data: &'a [f64],
    size: usize,
}

impl<'a> Kernel<'a> {
    /// # Panics
    ///
    /// If `size` is even or `size * size != data.len()`.
    pub const fn new(data: &'a [f64], size: usize) -> Kernel<'a> {
        assert!(size % 2 == 1, "kernel size must be odd");
        assert!(size * size == data.len(), "kernel data must be size x size");
        Kernel { data, size }
    }

    pub fn try_new(data: &'a [f64], size: usize) -> crate::Result<Kernel<'a>> {
        if size % 2 == 0 || size * size != data.len() {
            return Err(Error::InvalidKernelSize(size, data.len()));
        }
        Ok(Kernel { data, size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// # Panics
    ///
    /// If `x` or `y` is not smaller than the kernel size.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f64 {
        assert!(x < self.size && y < self.size, "kernel cell out of range");
        self.data[y * self.size + x]
    }

    fn radius(&self) -> i64 {
        (self.size / 2) as i64
    }

    pub fn convolve(&self, image: &Image) -> Image {
        log_dimensions("convolution", image.width(), image.height(), image.max_value());
        log::debug!("kernel size {}", self.size);
        let mut dots = Vec::with_capacity(image.dots().len());
        for row_index in 0..image.height() {
            for column_index in 0..image.width() {
                dots.push(self.convolve_dot(image, column_index, row_index));
            }
        }
        Image::from_valid_parts(image.width(), image.height(), image.max_value(), dots)
    }

    fn convolve_dot(&self, image: &Image, column_index: u32, row_index: u32) -> Pixel {
        let mut sums = [0.0_f64; 3];
        let radius = self.radius();
        for y in 0..self.size {
            let source_row = i64::from(row_index) + y as i64 - radius;
            if source_row < 0 || source_row >= i64::from(image.height()) {
                continue;
            }
            for x in 0..self.size {
                let source_column = i64::from(column_index) + x as i64 - radius;
                if source_column < 0 || source_column >= i64::from(image.width()) {
                    continue;
                }
                let weight = self.at(x, y);
                let channels = image.dot(source_column as u32, source_row as u32).channels();
                for (sum, channel) in sums.iter_mut().zip(channels) {
                    *sum += weight * f64::from(channel);
                }
            }
        }
        let [red, green, blue] = sums.map(|sum| clamp_channel(sum, image.max_value()));
        Pixel::new(red, green, blue)
    }
}

/// Gaussian blur `[[1, 2, 1], [2, 4, 2], [1, 2, 1]] / 16`.
#[rustfmt::skip]
pub const BLUR_3X3: Kernel<'static> = Kernel::new(&[
    0.0625, 0.125, 0.0625,
    0.125,  0.25,  0.125,
    0.0625, 0.125, 0.0625,
], 3);

/// Sharpen with weight 1 in the centre, 1/4 on the inner ring and -1/8 on
/// the outer ring.
#[rustfmt::skip]
pub const SHARPEN_5X5: Kernel<'static> = Kernel::new(&[
    -0.125, -0.125, -0.125, -0.125, -0.125,
    -0.125,  0.25,   0.25,   0.25,  -0.125,
    -0.125,  0.25,   1.0,    0.25,  -0.125,
    -0.125,  0.25,   0.25,   0.25,  -0.125,
    -0.125, -0.125, -0.125, -0.125, -0.125,
], 5);

#[cfg(test)]
mod test {
    use super::{Kernel, BLUR_3X3, SHARPEN_5X5};
    use crate::color::Pixel;
    use crate::error::Error;
    use crate::image::Image;

    fn uniform_image(width: u32, height: u32, level: u16) -> Image {
        let dots = vec![Pixel::grey(level); (width * height) as usize];
        Image::new(width, height, 255, dots).unwrap()
    }

    #[test]
    fn kernels_are_normalised() {
        let blur_sum: f64 = (0..3)
            .flat_map(|y| (0..3).map(move |x| (x, y)))
            .map(|(x, y)| BLUR_3X3.at(x, y))
            .sum();
        assert_eq!(blur_sum, 1.0);
        assert_eq!(SHARPEN_5X5.at(2, 2), 1.0);
        assert_eq!(SHARPEN_5X5.at(1, 3), 0.25);
        assert_eq!(SHARPEN_5X5.at(0, 4), -0.125);
    }

    #[test]
    fn blur_keeps_interior_of_uniform_image() {
        let blurred = BLUR_3X3.convolve(&uniform_image(3, 3, 100));
        assert_eq!(blurred.dot(1, 1), Pixel::grey(100));
    }

    #[test]
    fn blur_darkens_zero_padded_border() {
        let blurred = BLUR_3X3.convolve(&uniform_image(3, 3, 100));
        // edge centre misses one side of 4/16, corners miss 7/16
        assert_eq!(blurred.dot(1, 0), Pixel::grey(75));
        assert_eq!(blurred.dot(0, 1), Pixel::grey(75));
        assert_eq!(blurred.dot(0, 0), Pixel::grey(56));
        assert_eq!(blurred.dot(2, 2), Pixel::grey(56));
    }

    #[test]
    fn blur_single_row() {
        let blurred = BLUR_3X3.convolve(&uniform_image(3, 1, 100));
        assert_eq!(blurred.dot(1, 0), Pixel::grey(50));
        assert_eq!(blurred.dot(0, 0), Pixel::grey(37));
        assert!(blurred.dot(2, 0).red() < blurred.dot(1, 0).red());
    }

    #[test]
    fn blur_works_per_channel() {
        let image = Image::new(1, 1, 255, vec![Pixel::new(160, 80, 16)]).unwrap();
        assert_eq!(BLUR_3X3.convolve(&image).dot(0, 0), Pixel::new(40, 20, 4));
    }

    #[test]
    fn sharpen_clamps_to_max_value() {
        let mut dots = vec![Pixel::grey(0); 25];
        dots[12] = Pixel::grey(250);
        dots[6] = Pixel::grey(100);
        let image = Image::new(5, 5, 255, dots).unwrap();
        let sharpened = SHARPEN_5X5.convolve(&image);
        assert_eq!(sharpened.dot(2, 2), Pixel::grey(255));
        // the outer ring of a lone bright dot turns negative
        assert_eq!(sharpened.dot(4, 4), Pixel::grey(0));
    }

    #[test]
    fn sharpen_of_uniform_image_keeps_dimensions() {
        let image = uniform_image(7, 5, 40);
        let sharpened = SHARPEN_5X5.convolve(&image);
        assert_eq!(sharpened.width(), 7);
        assert_eq!(sharpened.height(), 5);
        // full neighbourhood: 40 * (1 + 8/4 - 16/8) = 40
        assert_eq!(sharpened.dot(3, 2), Pixel::grey(40));
    }

    #[test]
    fn reject_even_kernel() {
        let data = [0.25; 4];
        assert!(matches!(
            Kernel::try_new(&data, 2),
            Err(Error::InvalidKernelSize(2, 4))
        ));
        assert!(Kernel::try_new(&[1.0], 1).is_ok());
    }

    #[test]
    #[should_panic(expected = "kernel cell out of range")]
    fn kernel_cell_outside_of_row_panics() {
        BLUR_3X3.at(3, 0);
    }

    #[test]
    fn identity_kernel_keeps_image() {
        let identity = Kernel::new(&[1.0], 1);
        let image = Image::new(2, 1, 255, vec![Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)]).unwrap();
        assert_eq!(identity.convolve(&image), image);
    }
}
