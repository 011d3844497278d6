//! Target colors for the two pixel classes.

use palette::Srgb;

use crate::buffer::Rgba8;
use crate::error::{MaskError, Result};

/// An RGBA color with 8-bit RGB channels and a real-valued opacity.
///
/// Opacity is kept as a fraction in `[0, 1]` and only turned into an alpha
/// byte (`round(a * 255)`) when the color is written into a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    /// Creates a color. The opacity is clamped to `[0, 1]`; NaN becomes 0.
    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: clamp_opacity(a),
        }
    }

    /// Creates a fully opaque color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parses a hex RGB string (`#c89623`, `c89623` or `#c92`) and attaches
    /// the given opacity.
    ///
    /// ```
    /// use mask_renderer::Color;
    ///
    /// let color = Color::from_hex("#c89623", 0.5)?;
    /// assert_eq!(color.to_rgba8(), [200, 150, 35, 128]);
    /// # Ok::<(), mask_renderer::MaskError>(())
    /// ```
    pub fn from_hex(hex: &str, a: f32) -> Result<Self> {
        let rgb: Srgb<u8> = hex
            .trim()
            .parse()
            .map_err(|_| MaskError::InvalidColor(hex.to_string()))?;
        Ok(Self::new(rgb.red, rgb.green, rgb.blue, a))
    }

    /// Returns the RGB part as lowercase hex with a leading `#`.
    pub fn to_hex(&self) -> String {
        format!("#{:x}", Srgb::new(self.r, self.g, self.b))
    }

    /// The alpha byte written for this color: `round(a * 255)` clamped to
    /// `[0, 255]`.
    pub fn alpha_byte(&self) -> u8 {
        (clamp_opacity(self.a) * 255.0).round().clamp(0.0, 255.0) as u8
    }

    /// The exact bytes written into an output pixel for this color.
    pub fn to_rgba8(&self) -> Rgba8 {
        [self.r, self.g, self.b, self.alpha_byte()]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

fn clamp_opacity(a: f32) -> f32 {
    if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) }
}
