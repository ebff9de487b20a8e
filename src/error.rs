use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    MaskFileDoesNotContainRequiredToken(&'static str),
    ParsingOfMaskTokenFailed(&'static str),
    NotEnoughMaskValues(usize, usize),
    InvalidMaskSize(usize),
    InvalidImageDimensions(usize, usize),
    ImageAllocationTooLarge(usize, usize),
    MismatchedPixelBufferSize(usize, usize),
    UnableToOpenMaskFileForReading(String, std::io::Error),
    UnableToDecodeImage(String, image::ImageError),
    UnableToEncodeImage(String, image::ImageError),
    OutputFormatNotSupported(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MaskFileDoesNotContainRequiredToken(token_name) => {
                write!(f, "Expected token '{}' not found in mask file", token_name)
            }
            Self::ParsingOfMaskTokenFailed(token_name) => {
                write!(f, "Parsing of token '{}' failed", token_name)
            }
            Self::NotEnoughMaskValues(expected, found) => {
                write!(
                    f,
                    "Mask file declares {} values, but only {} were found",
                    expected, found
                )
            }
            Self::InvalidMaskSize(size) => {
                write!(f, "Mask size must be at least 1, but was {}", size)
            }
            Self::InvalidImageDimensions(width, height) => {
                write!(
                    f,
                    "Image dimensions must be positive, but were {}x{}",
                    width, height
                )
            }
            Self::ImageAllocationTooLarge(width, height) => {
                write!(
                    f,
                    "Pixel buffer for a {}x{} image exceeds the addressable size",
                    width, height
                )
            }
            Self::MismatchedPixelBufferSize(expected, found) => {
                write!(
                    f,
                    "Pixel buffer holds {} bytes, but the image dimensions require {}",
                    found, expected
                )
            }
            Self::UnableToOpenMaskFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open mask file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToDecodeImage(path, error) => {
                write!(f, "Unable to decode image '{}': {}", path, error)
            }
            Self::UnableToEncodeImage(path, error) => {
                write!(f, "Unable to encode image '{}': {}", path, error)
            }
            Self::OutputFormatNotSupported(path) => {
                write!(f, "Output file '{}' should end in .png or .bmp", path)
            }
        }
    }
}

impl std::error::Error for Error {}
