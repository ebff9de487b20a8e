use crate::error::Error;
use crate::Result;

/// Number of color components per pixel (red, green, blue).
pub const CHANNELS: usize = 3;

/// Dense row-major RGB raster with 8 bits per channel.
///
/// Pixel data lives in a single contiguous allocation indexed by
/// `(y * width + x) * CHANNELS + channel`. Dimensions are fixed after
/// creation and every cell is populated.
#[derive(Clone)]
pub struct Image {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Image {
    /// Creates a zero-filled image. Running out of memory aborts the
    /// process; there is no recovery path for failed allocations.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let length = Self::buffer_length(width, height)?;
        Ok(Image {
            width,
            height,
            data: vec![0; length],
        })
    }

    /// Adopts a decoded buffer of `width * height * CHANNELS` interleaved
    /// bytes, rows top to bottom.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let length = Self::buffer_length(width, height)?;
        if data.len() != length {
            return Err(Error::MismatchedPixelBufferSize(length, data.len()));
        }
        Ok(Image {
            width,
            height,
            data,
        })
    }

    fn buffer_length(width: usize, height: usize) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageDimensions(width, height));
        }
        width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or(Error::ImageAllocationTooLarge(width, height))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    /// Returns the pixel at `(x, y)`; each out-of-range coordinate is
    /// independently clamped to the nearest edge, so the lookup always
    /// hits a border pixel. In-bounds coordinates are an identity lookup.
    ///
    /// Clamping is the only border policy of the sampler; there is no
    /// zero-padding, wraparound or mirroring.
    pub fn sample(&self, x: i64, y: i64) -> [u8; CHANNELS] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.pixel(x, y)
    }

    /// In-bounds pixel lookup.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; CHANNELS] {
        debug_assert!(x < self.width && y < self.height);
        let offset = self.offset(x, y);
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: [u8; CHANNELS]) {
        debug_assert!(x < self.width && y < self.height);
        let offset = self.offset(x, y);
        self.data[offset..offset + CHANNELS].copy_from_slice(&pixel);
    }

    /// Overwrites every pixel with the corresponding pixel of `src`.
    ///
    /// Identical dimensions are a precondition of this call; the iteration
    /// driver is responsible for keeping its buffers congruent.
    pub fn copy_from(&mut self, src: &Image) {
        debug_assert_eq!(self.width, src.width);
        debug_assert_eq!(self.height, src.height);
        self.data.copy_from_slice(&src.data);
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}
