use std::io::Read;

use super::super::Image;
use super::super::ImageReader;
use crate::color::{check_channel_range, Pixel};
use crate::Error;

pub const P3_MAGIC_NUMBER: &str = "P3";
const COMMENT_MARKER: u8 = b'#';

pub struct PPMImageReader<T: Read> {
    reader: T,
}

impl<T: Read> PPMImageReader<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }
}

impl<T: Read> ImageReader for PPMImageReader<T> {
    fn read_image(&mut self) -> crate::Result<Image> {
        let mut tokenizer = PPMTokenizer::new(&mut self.reader);
        let mut parser = PPMParser::new(&mut tokenizer);
        parser.parse_tokens()
    }
}

/// Splits the input at ASCII whitespace. A `#` starts a comment that runs to
/// the end of the line.
struct PPMTokenizer<'a, R: Read> {
    reader: &'a mut R,
    buffer: Vec<u8>,
}

impl<'a, R: Read> PPMTokenizer<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        PPMTokenizer {
            reader,
            buffer: Vec::new(),
        }
    }
}

impl<R: Read> Iterator for PPMTokenizer<'_, R> {
    type Item = crate::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        let mut in_comment = false;

        for byte in self.reader.by_ref().bytes() {
            let byte = match byte {
                Ok(byte) => byte,
                Err(e) => return Some(Err(Error::UnableToReadInput(e))),
            };
            if in_comment {
                if byte == b'\n' {
                    in_comment = false;
                    if !self.buffer.is_empty() {
                        break;
                    }
                }
                continue;
            }
            if byte == COMMENT_MARKER {
                in_comment = true;
                continue;
            }
            if byte.is_ascii_whitespace() {
                if !self.buffer.is_empty() {
                    break;
                }
            } else {
                self.buffer.push(byte);
            }
        }

        if self.buffer.is_empty() {
            return None;
        }

        let token = String::from_utf8_lossy(&self.buffer).into_owned();
        Some(Ok(token))
    }
}

const P3_HEADER_TOKEN_NAME: &str = "P3 Header";
const WIDTH_HEADER_TOKEN_NAME: &str = "Width Header";
const HEIGHT_HEADER_TOKEN_NAME: &str = "Height Header";
const MAX_VALUE_HEADER_TOKEN_NAME: &str = "Max Value Header";
const COLOR_COMPONENT_VALUE_TOKEN_NAME: &str = "Color Component Value";

#[derive(Clone, Copy)]
struct Dot {
    buffer: [u16; 3],
    index: usize,
}

impl Dot {
    fn new() -> Self {
        Self {
            buffer: [u16::default(); 3],
            index: 0,
        }
    }

    fn push_color_component(&mut self, component: u16) {
        if self.is_complete() {
            return;
        }
        self.buffer[self.index] = component;
        self.index += 1;
    }

    fn is_complete(&self) -> bool {
        self.index == 3
    }

    fn reset(&mut self) {
        self.index = 0;
    }

    fn is_empty(&self) -> bool {
        self.index == 0
    }

    fn to_pixel(self) -> Pixel {
        let [red, green, blue] = self.buffer;
        Pixel::new(red, green, blue)
    }
}

struct PPMParser<'a, T> {
    tokenizer: &'a mut T,
}

impl<'a, T> PPMParser<'a, T>
where
    T: Iterator<Item = crate::Result<String>>,
{
    fn new(tokenizer: &'a mut T) -> Self {
        Self { tokenizer }
    }

    fn parse_tokens(&mut self) -> crate::Result<Image> {
        let header = self.parse_header()?;
        Self::check_header_version(&header)?;
        let width = self.parse_positive_header_value(WIDTH_HEADER_TOKEN_NAME)?;
        let height = self.parse_positive_header_value(HEIGHT_HEADER_TOKEN_NAME)?;
        let max_value = self.parse_positive_header_value(MAX_VALUE_HEADER_TOKEN_NAME)?;
        let dots = self.parse_all_dots(max_value)?;
        Self::check_parsed_dots_length_match_header_information(&dots, width, height)?;
        log::debug!(
            "parsed PPM image of {}x{} with max value {}",
            width,
            height,
            max_value
        );
        Ok(Image::from_valid_parts(width, height, max_value, dots))
    }

    fn next_token(&mut self, token_name: &'static str) -> crate::Result<String> {
        self.tokenizer
            .next()
            .ok_or(Error::PPMFileDoesNotContainRequiredToken(token_name))?
    }

    fn check_parsed_dots_length_match_header_information(
        dots: &[Pixel],
        width: u32,
        height: u32,
    ) -> crate::Result<()> {
        let expected_number_of_dots = width as usize * height as usize;
        if dots.len() != expected_number_of_dots {
            return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
        }
        Ok(())
    }

    fn check_header_version(header: &str) -> crate::Result<()> {
        if header != P3_MAGIC_NUMBER {
            return Err(Error::PPMFileDoesNotContainRequiredToken(
                P3_HEADER_TOKEN_NAME,
            ));
        }
        Ok(())
    }

    fn parse_header(&mut self) -> crate::Result<String> {
        self.next_token(P3_HEADER_TOKEN_NAME)
    }

    fn parse_positive_header_value<V>(&mut self, token_name: &'static str) -> crate::Result<V>
    where
        V: std::str::FromStr + Default + PartialEq,
    {
        let value: V = self
            .next_token(token_name)?
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(token_name))?;
        if value == V::default() {
            return Err(Error::HeaderValueMustBePositive(token_name));
        }
        Ok(value)
    }

    fn parse_all_dots(&mut self, max_value: u16) -> crate::Result<Vec<Pixel>> {
        let mut current_dot = Dot::new();
        let mut dots = Vec::new();
        for token in self.tokenizer.by_ref() {
            let component = Self::parse_color_value(&token?, max_value)?;
            current_dot.push_color_component(component);
            if current_dot.is_complete() {
                dots.push(current_dot.to_pixel());
                current_dot.reset();
            }
        }
        Self::check_pixel_was_complete(&current_dot)?;
        Ok(dots)
    }

    fn check_pixel_was_complete(dot: &Dot) -> crate::Result<()> {
        if !dot.is_empty() {
            return Err(Error::IncompletePixelParsed(dot.index));
        }
        Ok(())
    }

    fn parse_color_value(token: &str, max_value: u16) -> crate::Result<u16> {
        let value: i64 = token
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(COLOR_COMPONENT_VALUE_TOKEN_NAME))?;
        check_channel_range(value, max_value)
    }
}
