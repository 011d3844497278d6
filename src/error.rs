//! Error type shared by the buffer, engine, pipeline and codec boundary.

use crate::buffer::SizePx;

/// What was inconsistent in a [`MaskError::DimensionMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    /// Raw data length does not equal `4 * width * height`.
    #[error("a {size} buffer needs {expected} bytes, got {actual}")]
    Length {
        size: SizePx,
        expected: usize,
        actual: usize,
    },

    /// Width or height is zero.
    #[error("{0} has a zero dimension")]
    ZeroSized(SizePx),

    /// Two buffers that must be the same size are not.
    #[error("expected a {expected} buffer, got {actual}")]
    Size { expected: SizePx, actual: SizePx },
}

/// Errors produced while building buffers, converting, or crossing the
/// codec boundary.
///
/// Geometry errors ([`DimensionMismatch`](Self::DimensionMismatch),
/// [`OutOfBounds`](Self::OutOfBounds)) abort the operation without producing
/// partial output. Sequencing errors ([`NoSourceLoaded`](Self::NoSourceLoaded),
/// [`NoOutputAvailable`](Self::NoOutputAvailable)) leave the pipeline
/// untouched so the caller can simply retry in the right order.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(Mismatch),

    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("no source image loaded")]
    NoSourceLoaded,

    #[error("no converted output available")]
    NoOutputAvailable,

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("corrupt image data: {0}")]
    CorruptData(String),

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("invalid color {0:?}, expected a hex value like #c89623")]
    InvalidColor(String),

    #[error("invalid profile: {0}")]
    Profile(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MaskError {
    /// Returns true for sequencing errors the caller can recover from by
    /// loading or converting first.
    pub fn is_sequencing(&self) -> bool {
        matches!(self, Self::NoSourceLoaded | Self::NoOutputAvailable)
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = MaskError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequencing_errors_are_flagged() {
        assert!(MaskError::NoSourceLoaded.is_sequencing());
        assert!(MaskError::NoOutputAvailable.is_sequencing());
        assert!(!MaskError::CorruptData("eof".into()).is_sequencing());
    }

    #[test]
    fn dimension_mismatch_messages() {
        let length = MaskError::DimensionMismatch(Mismatch::Length {
            size: SizePx::new(2, 1),
            expected: 8,
            actual: 7,
        });
        assert_eq!(
            length.to_string(),
            "dimension mismatch: a 2x1 buffer needs 8 bytes, got 7"
        );

        let size = MaskError::DimensionMismatch(Mismatch::Size {
            expected: SizePx::new(2, 1),
            actual: SizePx::new(1, 2),
        });
        assert_eq!(
            size.to_string(),
            "dimension mismatch: expected a 2x1 buffer, got 1x2"
        );
    }
}
