//! Decode/encode boundary.
//!
//! The pipeline only ever sees fully decoded [`PixelBuffer`]s. Turning bytes
//! into pixels and back is delegated to a [`Decoder`] / [`Encoder`], with
//! [`PngCodec`] as the stock implementation on top of the `image` crate.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError};

use crate::buffer::PixelBuffer;
use crate::error::{MaskError, Result};

/// Suggested file name for exported output.
pub const DEFAULT_EXPORT_NAME: &str = "converted.png";

/// Turns encoded image bytes into an RGBA buffer.
pub trait Decoder {
    /// Fails with [`MaskError::UnsupportedFormat`] when the format is not
    /// recognised and [`MaskError::CorruptData`] when it is but the data
    /// cannot be read.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer>;
}

/// Turns an RGBA buffer into encoded image bytes.
pub trait Encoder {
    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>>;
}

/// Decodes anything the `image` crate can sniff, encodes lossless RGBA PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl Decoder for PngCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        let decoded = image::load_from_memory(bytes).map_err(decode_error)?;
        PixelBuffer::from_image(decoded.to_rgba8())
    }
}

impl Encoder for PngCodec {
    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(
                buffer.as_raw(),
                buffer.width(),
                buffer.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| MaskError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

fn decode_error(err: ImageError) -> MaskError {
    match err {
        ImageError::Unsupported(e) => MaskError::UnsupportedFormat(e.to_string()),
        other => MaskError::CorruptData(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> PixelBuffer {
        PixelBuffer::from_raw(2, 1, vec![200, 150, 35, 128, 0, 0, 0, 0]).unwrap()
    }

    #[test]
    fn encode_produces_png_signature() {
        let bytes = PngCodec.encode(&sample()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn png_preserves_alpha() {
        let bytes = PngCodec.encode(&sample()).unwrap();
        let decoded = PngCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn garbage_is_unsupported() {
        let err = PngCodec.decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, MaskError::UnsupportedFormat(_)), "{err:?}");
    }

    #[test]
    fn truncated_png_is_corrupt() {
        let bytes = PngCodec.encode(&sample()).unwrap();
        let err = PngCodec.decode(&bytes[..20]).unwrap_err();
        assert!(matches!(err, MaskError::CorruptData(_)), "{err:?}");
    }

    #[test]
    fn rgb_input_becomes_opaque_rgba() {
        let rgb = image::RgbImage::from_raw(1, 1, vec![10, 20, 30]).unwrap();
        let mut bytes = Cursor::new(Vec::new());
        rgb.write_to(&mut bytes, image::ImageFormat::Png).unwrap();

        let decoded = PngCodec.decode(bytes.get_ref()).unwrap();
        assert_eq!(decoded.get_pixel(0, 0).unwrap(), [10, 20, 30, 255]);
    }
}
