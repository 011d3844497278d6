//! mask-renderer: brightness-threshold masking for RGBA images
//!
//! Every pixel of a source image is classified by its brightness sum
//! (`r + g + b`) against a threshold. Pixels at or below the threshold are
//! painted with the mask color, all others with the background color. Both
//! colors carry their own opacity, so the result can be a translucent
//! overlay or a cut-out.
//!
//! # Example
//!
//! ```
//! use mask_renderer::{Color, MaskParameters, PipelineState, PixelBuffer, Threshold};
//!
//! let mut state = PipelineState::new();
//! state.load_source(PixelBuffer::from_raw(2, 1, vec![10, 10, 10, 255, 250, 250, 250, 255])?);
//!
//! // Parameters are held until the next explicit conversion.
//! state.set_parameters(
//!     MaskParameters::default()
//!         .with_threshold(Threshold::new(205))
//!         .with_mask_color(Color::new(200, 150, 35, 0.5))
//!         .with_background_color(Color::TRANSPARENT),
//! );
//!
//! let output = state.convert()?;
//! assert_eq!(output.get_pixel(0, 0)?, [200, 150, 35, 128]);
//! assert_eq!(output.get_pixel(1, 0)?, [0, 0, 0, 0]);
//!
//! let png: Vec<u8> = state.export_output()?;
//! # assert!(!png.is_empty());
//! # Ok::<(), mask_renderer::MaskError>(())
//! ```
//!
//! # Serializable Profiles
//!
//! Parameters can be saved and restored as JSON through [`MaskProfile`]
//! and the [`Configurable`] trait:
//!
//! ```
//! use mask_renderer::{Configurable, MaskProfile, PipelineState};
//!
//! let mut state = PipelineState::new();
//! state.apply_profile(&MaskProfile::new().with_threshold(300));
//!
//! let json = state.export_profile().to_json().unwrap();
//! assert!(json.contains("\"threshold\":300"));
//! ```

mod buffer;
mod codec;
mod error;
mod mask;
mod pipeline;
mod profile;

pub use buffer::{CHANNELS, PixelBuffer, Rgba8, SizePx};
pub use codec::{DEFAULT_EXPORT_NAME, Decoder, Encoder, PngCodec};
pub use error::{MaskError, Mismatch, Result};
pub use mask::engine::DEFAULT_PARALLEL_MIN_PIXELS;
pub use mask::{
    Color, MaskParameters, MaskingEngine, ParameterConfig, Threshold, apply_mask, brightness,
    classify, recolor_pixel,
};
pub use pipeline::{Configurable, PipelineStage, PipelineState};
pub use profile::{ColorSettings, MaskProfile};
