use std::io::{self, Write};

use super::super::{Image, ImageWriter};
use crate::color::Pixel;
use crate::image::reader::ppm::P3_MAGIC_NUMBER;
use crate::Error;

/// Writes the canonical plain PPM layout: magic number, dimensions and max
/// value on their own lines, followed by one line per pixel.
pub struct PPMImageWriter<T: Write> {
    writer: T,
}

impl<T: Write> PPMImageWriter<T> {
    pub fn new(writer: T) -> Self {
        Self { writer }
    }

    fn encode(&mut self, image: &Image) -> io::Result<()> {
        self.write_magic_number()?;
        self.write_dimensions(image.width(), image.height())?;
        self.write_max_value(image.max_value())?;
        for dot in image.dots() {
            self.write_dot(dot)?;
        }
        self.writer.flush()
    }

    fn write_magic_number(&mut self) -> io::Result<()> {
        writeln!(self.writer, "{}", P3_MAGIC_NUMBER)
    }

    fn write_dimensions(&mut self, width: u32, height: u32) -> io::Result<()> {
        writeln!(self.writer, "{} {}", width, height)
    }

    fn write_max_value(&mut self, max_value: u16) -> io::Result<()> {
        writeln!(self.writer, "{}", max_value)
    }

    fn write_dot(&mut self, dot: &Pixel) -> io::Result<()> {
        writeln!(self.writer, "{} {} {}", dot.red(), dot.green(), dot.blue())
    }
}

impl<T: Write> ImageWriter for PPMImageWriter<T> {
    fn write_image(&mut self, image: &Image) -> crate::Result<()> {
        self.encode(image).map_err(Error::FailedToWriteImageData)
    }
}
