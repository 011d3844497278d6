//! Serializable mask parameters.
//!
//! A [`MaskProfile`] captures the threshold and both colors in a JSON-friendly
//! form, so settings can be saved next to an image, passed between processes
//! or loaded by the command line tool.
//!
//! # Example
//!
//! ```
//! use mask_renderer::{ColorSettings, MaskProfile};
//!
//! let profile = MaskProfile::new()
//!     .with_threshold(300)
//!     .with_mask_color(ColorSettings { r: 255, g: 0, b: 0, a: 0.25 });
//!
//! let json = profile.to_json().unwrap();
//! let restored = MaskProfile::from_json(&json).unwrap();
//! assert_eq!(restored.threshold, 300);
//! ```

use serde::{Deserialize, Serialize};

use crate::mask::{Color, MaskParameters, Threshold};

// ============================================================================
// ColorSettings
// ============================================================================

/// Serializable RGBA color, matching the shape color pickers emit.
///
/// ```json
/// { "r": 200, "g": 150, "b": 35, "a": 0.5 }
/// ```
///
/// `a` defaults to `1.0` (opaque) when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ColorSettings {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl From<Color> for ColorSettings {
    fn from(color: Color) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

impl From<ColorSettings> for Color {
    fn from(settings: ColorSettings) -> Self {
        Color::new(settings.r, settings.g, settings.b, settings.a)
    }
}

// ============================================================================
// MaskProfile
// ============================================================================

/// A serializable snapshot of [`MaskParameters`].
///
/// Every field is optional on input and falls back to the defaults
/// (threshold 205, amber half-transparent mask, transparent background).
/// Out-of-range thresholds and opacities are clamped when the profile is
/// turned into parameters.
///
/// # JSON Format
///
/// ```json
/// {
///   "threshold": 205,
///   "maskColor": { "r": 200, "g": 150, "b": 35, "a": 0.5 },
///   "backgroundColor": { "r": 0, "g": 0, "b": 0, "a": 0.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct MaskProfile {
    /// Brightness cutoff, clamped to 0-765 when applied.
    pub threshold: i32,

    /// Color for pixels at or below the threshold.
    pub mask_color: ColorSettings,

    /// Color for pixels above the threshold.
    pub background_color: ColorSettings,
}

impl Default for MaskProfile {
    fn default() -> Self {
        MaskParameters::default().into()
    }
}

impl MaskProfile {
    /// Creates a profile holding the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_mask_color(mut self, color: ColorSettings) -> Self {
        self.mask_color = color;
        self
    }

    pub fn with_background_color(mut self, color: ColorSettings) -> Self {
        self.background_color = color;
        self
    }

    /// Converts to validated parameters, clamping out-of-range values.
    pub fn to_parameters(&self) -> MaskParameters {
        MaskParameters::new(
            Threshold::new(self.threshold),
            self.mask_color.into(),
            self.background_color.into(),
        )
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<MaskParameters> for MaskProfile {
    fn from(params: MaskParameters) -> Self {
        Self {
            threshold: params.threshold.get() as i32,
            mask_color: params.mask_color.into(),
            background_color: params.background_color.into(),
        }
    }
}

impl From<&MaskProfile> for MaskParameters {
    fn from(profile: &MaskProfile) -> Self {
        profile.to_parameters()
    }
}

// ============================================================================
// Tests
// ============================================================================
