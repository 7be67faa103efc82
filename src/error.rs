use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    PPMFileDoesNotContainRequiredToken(&'static str),
    ParsingOfTokenFailed(&'static str),
    HeaderValueMustBePositive(&'static str),
    IncompletePixelParsed(usize),
    MismatchOfSizeBetweenHeaderAndValues,
    ChannelValueOutOfRange(i64, u16),
    UnableToReadInput(std::io::Error),
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToWriteImageData(std::io::Error),
    BinaryImageCodecFailed(String, ::image::ImageError),
    InvalidImageDimensions(u32, u32),
    InvalidMaxValue,
    PixelCountDoesNotMatchDimensions(usize, usize),
    UnknownGreyscaleComponent(String),
    MismatchOfDimensionsBetweenChannelSources,
    MismatchOfMaxValueBetweenChannelSources,
    ChannelSourceIsNotGreyscale(&'static str),
    InvalidKernelSize(usize, usize),
    EmptyImageName,
    ImageNotFound(String),
    MissingInstructionArgument(&'static str),
    InvalidInstructionArgument(&'static str, String),
    UnexpectedInstructionArgument(String),
    UndefinedInstruction(String),
    ScriptNestingTooDeep(usize),
    FailedToWriteMessage(std::io::Error),
}

/// Coarse classification of [`Error`] used by callers that only care about
/// the category of a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    InvalidArgument,
    NotFound,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PPMFileDoesNotContainRequiredToken(_)
            | Self::ParsingOfTokenFailed(_)
            | Self::HeaderValueMustBePositive(_)
            | Self::IncompletePixelParsed(_)
            | Self::MismatchOfSizeBetweenHeaderAndValues
            | Self::ChannelValueOutOfRange(_, _) => ErrorKind::Format,
            Self::UnableToReadInput(_)
            | Self::UnableToOpenInputFileForReading(_, _)
            | Self::UnableToOpenOutputFileForWriting(_, _)
            | Self::FailedToWriteImageData(_)
            | Self::BinaryImageCodecFailed(_, _)
            | Self::FailedToWriteMessage(_) => ErrorKind::Io,
            Self::ImageNotFound(_) => ErrorKind::NotFound,
            Self::InvalidImageDimensions(_, _)
            | Self::InvalidMaxValue
            | Self::PixelCountDoesNotMatchDimensions(_, _)
            | Self::UnknownGreyscaleComponent(_)
            | Self::MismatchOfDimensionsBetweenChannelSources
            | Self::MismatchOfMaxValueBetweenChannelSources
            | Self::ChannelSourceIsNotGreyscale(_)
            | Self::InvalidKernelSize(_, _)
            | Self::EmptyImageName
            | Self::MissingInstructionArgument(_)
            | Self::InvalidInstructionArgument(_, _)
            | Self::UnexpectedInstructionArgument(_)
            | Self::UndefinedInstruction(_)
            | Self::ScriptNestingTooDeep(_) => ErrorKind::InvalidArgument,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PPMFileDoesNotContainRequiredToken(token_name) => {
                write!(f, "Expected token '{}' not found in PPM file", token_name)
            }
            Self::ParsingOfTokenFailed(token_name) => {
                write!(f, "Parsing of token '{}' failed", token_name)
            }
            Self::HeaderValueMustBePositive(token_name) => {
                write!(f, "Value of token '{}' must be greater than zero", token_name)
            }
            Self::IncompletePixelParsed(number_of_tokens_parsed) => {
                write!(
                    f,
                    "Incomplete pixel parsed. Expected 3 components, but got {}.",
                    number_of_tokens_parsed
                )
            }
            Self::MismatchOfSizeBetweenHeaderAndValues => {
                write!(
                    f,
                    "Number of pixels does not match the size provided in header"
                )
            }
            Self::ChannelValueOutOfRange(value, max) => {
                write!(
                    f,
                    "Color value {} is outside of the allowed range 0..={}",
                    value, max
                )
            }
            Self::UnableToReadInput(error) => {
                write!(f, "Unable to read image data: {}", error)
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToWriteImageData(error) => {
                write!(f, "Failed to write image data: {}", error)
            }
            Self::BinaryImageCodecFailed(path, error) => {
                write!(f, "Unable to convert image file '{}': {}", path, error)
            }
            Self::InvalidImageDimensions(width, height) => {
                write!(
                    f,
                    "Image dimensions {}x{} are invalid, both must be greater than zero",
                    width, height
                )
            }
            Self::InvalidMaxValue => write!(f, "Max value of an image must be greater than zero"),
            Self::PixelCountDoesNotMatchDimensions(expected, actual) => {
                write!(
                    f,
                    "Expected {} pixels according to the dimensions, but got {}",
                    expected, actual
                )
            }
            Self::UnknownGreyscaleComponent(component) => {
                write!(
                    f,
                    "Unknown greyscale component '{}'. Valid components are: red, green, blue, value, intensity, luma",
                    component
                )
            }
            Self::MismatchOfDimensionsBetweenChannelSources => {
                write!(f, "Channel sources must have the same width and height")
            }
            Self::MismatchOfMaxValueBetweenChannelSources => {
                write!(f, "Channel sources must have the same max value")
            }
            Self::ChannelSourceIsNotGreyscale(channel_name) => {
                write!(f, "The {} channel source is not a greyscale image", channel_name)
            }
            Self::InvalidKernelSize(size, number_of_weights) => {
                write!(
                    f,
                    "A kernel of size {0} must be odd and hold {0}x{0} weights, but got {1}",
                    size, number_of_weights
                )
            }
            Self::EmptyImageName => write!(f, "Image name must not be empty"),
            Self::ImageNotFound(name) => write!(f, "Image '{}' not found", name),
            Self::MissingInstructionArgument(argument_name) => {
                write!(f, "Missing instruction argument '{}'", argument_name)
            }
            Self::InvalidInstructionArgument(argument_name, value) => {
                write!(
                    f,
                    "Invalid value '{}' for instruction argument '{}'",
                    value, argument_name
                )
            }
            Self::UnexpectedInstructionArgument(value) => {
                write!(f, "Unexpected instruction argument '{}'", value)
            }
            Self::UndefinedInstruction(instruction) => {
                write!(f, "Undefined instruction: {}", instruction)
            }
            Self::ScriptNestingTooDeep(depth) => {
                write!(f, "Scripts must not be nested deeper than {} levels", depth)
            }
            Self::FailedToWriteMessage(error) => {
                write!(f, "Failed to write message: {}", error)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToReadInput(error)
            | Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::FailedToWriteImageData(error)
            | Self::FailedToWriteMessage(error) => Some(error),
            Self::BinaryImageCodecFailed(_, error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Error, ErrorKind};

    #[test]
    fn classify_errors() {
        assert_eq!(
            Error::MismatchOfSizeBetweenHeaderAndValues.kind(),
            ErrorKind::Format
        );
        assert_eq!(
            Error::ImageNotFound("koala".to_owned()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::UnknownGreyscaleComponent("alpha".to_owned()).kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn display_names_the_missing_image() {
        let message = Error::ImageNotFound("koala".to_owned()).to_string();
        assert_eq!(message, "Image 'koala' not found");
    }
}
