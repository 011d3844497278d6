//! Brightness-sum pixel classification.

use super::Threshold;
use crate::buffer::Rgba8;

/// Additive brightness of a pixel: `r + g + b`, in `[0, 765]`.
///
/// Alpha is ignored.
#[inline]
pub fn brightness(pixel: &Rgba8) -> u16 {
    let [r, g, b, _] = *pixel;
    r as u16 + g as u16 + b as u16
}

/// Returns true if the pixel belongs to the foreground (mask) class.
///
/// A pixel is foreground when its brightness does not exceed the threshold,
/// so a pixel whose brightness equals the threshold is masked.
///
/// ```
/// use mask_renderer::{classify, Threshold};
///
/// let threshold = Threshold::new(30);
/// assert!(classify(&[10, 10, 10, 255], threshold));
/// assert!(!classify(&[10, 10, 11, 255], threshold));
/// ```
#[inline]
pub fn classify(pixel: &Rgba8, threshold: Threshold) -> bool {
    brightness(pixel) <= threshold.get()
}
