//! Owned RGBA pixel storage.
//!
//! [`PixelBuffer`] is the unit the masking engine reads and writes: a dense,
//! row-major raster of 8-bit RGBA pixels whose byte length always equals
//! `4 * width * height`.

use std::fmt;

use image::RgbaImage;

use crate::error::{MaskError, Mismatch, Result};

/// One pixel as `[r, g, b, a]`.
pub type Rgba8 = [u8; 4];

/// Bytes per pixel.
pub const CHANNELS: usize = 4;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this size.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of an RGBA buffer of this size, or `None` on overflow.
    pub fn byte_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(CHANNELS)
    }

    /// Returns true if either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for SizePx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn check_not_empty(size: SizePx) -> Result<()> {
    if size.is_empty() {
        return Err(MaskError::DimensionMismatch(Mismatch::ZeroSized(size)));
    }
    Ok(())
}

/// An owned, mutable 8-bit RGBA raster of fixed dimensions.
///
/// # Example
///
/// ```
/// use mask_renderer::PixelBuffer;
///
/// let mut buffer = PixelBuffer::from_raw(2, 1, vec![10, 10, 10, 255, 250, 250, 250, 255])?;
/// assert_eq!(buffer.get_pixel(1, 0)?, [250, 250, 250, 255]);
///
/// buffer.set_pixel(0, 0, [1, 2, 3, 4])?;
/// let pixels: Vec<_> = buffer.pixels().collect();
/// assert_eq!(pixels, vec![[1, 2, 3, 4], [250, 250, 250, 255]]);
/// # Ok::<(), mask_renderer::MaskError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: RgbaImage,
}

impl PixelBuffer {
    /// Creates a fully transparent black buffer.
    ///
    /// Fails with [`MaskError::DimensionMismatch`] if either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_not_empty(SizePx::new(width, height))?;
        Ok(Self {
            data: RgbaImage::new(width, height),
        })
    }

    /// Wraps raw decoded RGBA bytes.
    ///
    /// Fails with [`MaskError::DimensionMismatch`] if either side is zero or
    /// unless `data.len() == 4 * width * height` exactly.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let size = SizePx::new(width, height);
        check_not_empty(size)?;

        let expected = size.byte_len().unwrap_or(usize::MAX);
        let actual = data.len();
        let mismatch = MaskError::DimensionMismatch(Mismatch::Length {
            size,
            expected,
            actual,
        });
        if expected != actual {
            return Err(mismatch);
        }

        let data = RgbaImage::from_raw(width, height, data).ok_or(mismatch)?;
        Ok(Self { data })
    }

    /// Wraps an already decoded image. Zero-sized images are rejected.
    pub fn from_image(image: RgbaImage) -> Result<Self> {
        check_not_empty(SizePx::new(image.width(), image.height()))?;
        Ok(Self { data: image })
    }

    /// A transparent black buffer with the same dimensions as `self`.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            data: RgbaImage::new(self.width(), self.height()),
        }
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Returns the pixel dimensions of the buffer.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Number of pixels in the buffer.
    pub fn pixel_count(&self) -> usize {
        self.dimensions().pixel_count()
    }

    /// Returns true if both buffers have the same width and height.
    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(MaskError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }

    /// Reads the pixel at `(x, y)`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Rgba8> {
        self.check_bounds(x, y)?;
        Ok(self.data.get_pixel(x, y).0)
    }

    /// Overwrites the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba8) -> Result<()> {
        self.check_bounds(x, y)?;
        self.data.get_pixel_mut(x, y).0 = pixel;
        Ok(())
    }

    /// Iterates over all pixels in row-major order.
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = Rgba8> + '_ {
        let (pixels, _) = self.data.as_raw().as_chunks::<CHANNELS>();
        pixels.iter().copied()
    }

    /// The raw RGBA bytes in row-major order.
    pub fn as_raw(&self) -> &[u8] {
        self.data.as_raw()
    }

    /// Mutable access to the raw RGBA bytes. The length cannot change.
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Borrows the underlying image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.data
    }

    /// Consumes the buffer, returning the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.data
    }

    /// Consumes the buffer, returning the raw RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw()
    }
}

impl TryFrom<RgbaImage> for PixelBuffer {
    type Error = MaskError;

    fn try_from(image: RgbaImage) -> Result<Self> {
        Self::from_image(image)
    }
}
