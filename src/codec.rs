use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::error::Error;
use crate::raster::Image;
use crate::Result;

/// Decodes the file at `path` into an RGB raster. Any pixel format the
/// decoder understands is converted to 8 bit RGB.
pub fn read_image(path: &Path) -> Result<Image> {
    let decoded = image::open(path)
        .map_err(|e| Error::UnableToDecodeImage(path.to_string_lossy().into_owned(), e))?
        .into_rgb8();
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;
    Image::from_raw(width, height, decoded.into_raw())
}

/// Encodes `image` into the file at `path`, consuming its pixel
/// buffer. The format is chosen by file extension. Only the lossless
/// PNG and BMP formats are offered, a lossy encoder would disturb the
/// computed channel values.
pub fn write_image(path: &Path, image: Image) -> Result<()> {
    let format = output_format(path)?;
    let width = image.width() as u32;
    let height = image.height() as u32;
    let buffer = RgbImage::from_raw(width, height, image.into_raw())
        .expect("Pixel buffer length matches its dimensions");
    buffer
        .save_with_format(path, format)
        .map_err(|e| Error::UnableToEncodeImage(path.to_string_lossy().into_owned(), e))
}

fn output_format(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or("");
    if extension.eq_ignore_ascii_case("png") {
        Ok(ImageFormat::Png)
    } else if extension.eq_ignore_ascii_case("bmp") {
        Ok(ImageFormat::Bmp)
    } else {
        Err(Error::OutputFormatNotSupported(
            path.to_string_lossy().into_owned(),
        ))
    }
}
