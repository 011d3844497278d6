//! Mask parameters and the brightness-threshold transform.
//!
//! The transform is split the same way it runs:
//!
//! - [`classify`](classify::classify) decides, per source pixel, whether it
//!   belongs to the foreground (mask) class or the background class.
//! - [`MaskingEngine`] walks a whole buffer and writes the class color for
//!   every pixel.
//!
//! [`MaskParameters`] bundles the inputs. Values coming from the outside are
//! clamped into range by the constructors, so a `MaskParameters` is always
//! valid to convert with.

pub mod classify;
pub mod color;
pub mod engine;

pub use classify::{brightness, classify};
pub use color::Color;
pub use engine::{MaskingEngine, apply_mask, recolor_pixel};

// ============================================================================
// Threshold
// ============================================================================

/// Brightness cutoff in `[0, 765]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(u16);

impl Threshold {
    /// Masks only pure black pixels.
    pub const MIN: Self = Self(0);

    /// `3 * 255`, masks every pixel.
    pub const MAX: Self = Self(765);

    pub const DEFAULT: Self = Self(205);

    /// Creates a threshold, clamping the value into `[0, 765]`.
    pub fn new(value: i32) -> Self {
        Self(value.clamp(Self::MIN.0 as i32, Self::MAX.0 as i32) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u16> for Threshold {
    fn from(value: u16) -> Self {
        Self::new(value as i32)
    }
}

// ============================================================================
// Change detection
// ============================================================================

/// Trait for parameter types whose changes drive output staleness.
pub trait ParameterConfig: Clone {
    /// Returns true if this config differs from another in a way that
    /// would produce different output.
    fn differs_from(&self, other: &Self) -> bool;
}

// ============================================================================
// MaskParameters
// ============================================================================

/// Everything a conversion needs besides the source buffer.
///
/// Defaults to threshold 205, a half-transparent amber mask
/// (`200, 150, 35, 0.5`) and a fully transparent background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskParameters {
    pub threshold: Threshold,
    /// Color written to foreground pixels (brightness <= threshold).
    pub mask_color: Color,
    /// Color written to background pixels (brightness > threshold).
    pub background_color: Color,
}

impl MaskParameters {
    pub const DEFAULT_MASK_COLOR: Color = Color {
        r: 200,
        g: 150,
        b: 35,
        a: 0.5,
    };

    pub fn new(threshold: Threshold, mask_color: Color, background_color: Color) -> Self {
        Self {
            threshold,
            mask_color,
            background_color,
        }
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_mask_color(mut self, color: Color) -> Self {
        self.mask_color = color;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }
}

impl Default for MaskParameters {
    fn default() -> Self {
        Self::new(
            Threshold::DEFAULT,
            Self::DEFAULT_MASK_COLOR,
            Color::TRANSPARENT,
        )
    }
}

impl ParameterConfig for MaskParameters {
    /// Colors are compared by the bytes they produce, so opacity changes
    /// smaller than one alpha step do not count.
    fn differs_from(&self, other: &Self) -> bool {
        self.threshold != other.threshold
            || self.mask_color.to_rgba8() != other.mask_color.to_rgba8()
            || self.background_color.to_rgba8() != other.background_color.to_rgba8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_clamps() {
        assert_eq!(Threshold::new(-5), Threshold::MIN);
        assert_eq!(Threshold::new(1000), Threshold::MAX);
        assert_eq!(Threshold::new(300).get(), 300);
        assert_eq!(Threshold::from(u16::MAX), Threshold::MAX);
    }

    #[test]
    fn defaults_match_initial_ui_state() {
        let params = MaskParameters::default();
        assert_eq!(params.threshold.get(), 205);
        assert_eq!(params.mask_color.to_rgba8(), [200, 150, 35, 128]);
        assert_eq!(params.background_color.to_rgba8(), [0, 0, 0, 0]);
    }

    #[test]
    fn differs_from_detects_changes() {
        let base = MaskParameters::default();
        assert!(!base.differs_from(&base));

        let moved = base.with_threshold(Threshold::new(206));
        assert!(base.differs_from(&moved));

        let recolored = base.with_background_color(Color::opaque(0, 0, 0));
        assert!(base.differs_from(&recolored));
    }

    #[test]
    fn sub_step_opacity_change_is_not_a_difference() {
        let base = MaskParameters::default();
        let nudged = base.with_mask_color(Color::new(200, 150, 35, 0.5001));
        assert!(!base.differs_from(&nudged));
    }
}
