//! Session state: source image, parameters, and the last rendered output.

use crate::buffer::PixelBuffer;
use crate::codec::{Decoder, Encoder, PngCodec};
use crate::error::{MaskError, Result};
use crate::mask::{MaskParameters, MaskingEngine, ParameterConfig};
use crate::profile::MaskProfile;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`MaskProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &MaskProfile);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> MaskProfile;
}

// ============================================================================
// PipelineStage
// ============================================================================

/// Where a [`PipelineState`] is in its load/convert cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// No source image loaded yet.
    Empty,
    /// A source is loaded but has not been converted since it was loaded.
    SourceLoaded,
    /// A converted output is available for preview and export.
    OutputReady,
}

// ============================================================================
// PipelineState
// ============================================================================

/// A converted buffer plus the parameter version it was rendered with.
#[derive(Debug, Clone)]
struct RenderedOutput {
    buffer: PixelBuffer,
    params_version: u64,
}

/// Holds one session's source image, mask parameters and output.
///
/// Parameter changes never recompute on their own: call
/// [`convert`](Self::convert) to render, then
/// [`export_output`](Self::export_output) to encode. Loading a new source
/// discards any previous output.
///
/// Not internally synchronized. Drive each instance from one owner.
///
/// # Example
///
/// ```
/// use mask_renderer::{MaskParameters, PipelineStage, PipelineState, PixelBuffer, Threshold};
///
/// let mut state = PipelineState::new();
/// state.load_source(PixelBuffer::from_raw(2, 1, vec![10, 10, 10, 255, 250, 250, 250, 255])?);
/// state.set_parameters(MaskParameters::default().with_threshold(Threshold::new(100)));
///
/// let output = state.convert()?;
/// assert_eq!(output.get_pixel(0, 0)?, [200, 150, 35, 128]);
/// assert_eq!(state.stage(), PipelineStage::OutputReady);
///
/// let png = state.export_output()?;
/// assert_eq!(&png[1..4], b"PNG");
/// # Ok::<(), mask_renderer::MaskError>(())
/// ```
pub struct PipelineState<C = PngCodec> {
    codec: C,
    engine: MaskingEngine,
    source: Option<PixelBuffer>,
    params: MaskParameters,
    /// Bumped whenever `params` changes in a way that affects output.
    params_version: u64,
    output: Option<RenderedOutput>,
}

impl PipelineState<PngCodec> {
    /// Creates an empty state using the PNG codec and default parameters.
    pub fn new() -> Self {
        Self::with_codec(PngCodec)
    }
}

impl Default for PipelineState<PngCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> PipelineState<C> {
    /// Creates an empty state that decodes and encodes through `codec`.
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            engine: MaskingEngine::default(),
            source: None,
            params: MaskParameters::default(),
            params_version: 0,
            output: None,
        }
    }

    /// Replaces the masking engine, e.g. to tune parallelism.
    pub fn with_engine(mut self, engine: MaskingEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Returns the current stage.
    pub fn stage(&self) -> PipelineStage {
        match (&self.source, &self.output) {
            (None, _) => PipelineStage::Empty,
            (Some(_), None) => PipelineStage::SourceLoaded,
            (Some(_), Some(_)) => PipelineStage::OutputReady,
        }
    }

    /// Replaces the source image and discards any previous output.
    pub fn load_source(&mut self, buffer: PixelBuffer) {
        tracing::debug!(
            width = buffer.width(),
            height = buffer.height(),
            discarded_output = self.output.is_some(),
            "loaded source image"
        );
        self.source = Some(buffer);
        self.output = None;
    }

    /// Returns the loaded source image, if any.
    pub fn source(&self) -> Option<&PixelBuffer> {
        self.source.as_ref()
    }

    /// Returns the current parameters.
    pub fn parameters(&self) -> &MaskParameters {
        &self.params
    }

    /// Updates the parameters without converting.
    ///
    /// Returns true if the new parameters would render differently. An
    /// existing output stays available but becomes stale until the next
    /// [`convert`](Self::convert).
    pub fn set_parameters(&mut self, params: MaskParameters) -> bool {
        let changed = self.params.differs_from(&params);
        self.params = params;
        if changed {
            self.params_version = self.params_version.wrapping_add(1);
        }
        tracing::trace!(
            threshold = params.threshold.get(),
            changed,
            "parameters updated"
        );
        changed
    }

    /// Masks the source with the current parameters and stores the result,
    /// overwriting any previous output.
    ///
    /// Fails with [`MaskError::NoSourceLoaded`] before the first
    /// [`load_source`](Self::load_source).
    pub fn convert(&mut self) -> Result<&PixelBuffer> {
        let source = self.source.as_ref().ok_or(MaskError::NoSourceLoaded)?;

        // Reuse the previous allocation when the size still fits.
        let buffer = match self.output.take() {
            Some(previous) if previous.buffer.same_size(source) => {
                let mut buffer = previous.buffer;
                self.engine.apply_into(source, &self.params, &mut buffer)?;
                buffer
            }
            _ => self.engine.apply(source, &self.params),
        };

        tracing::debug!(
            width = buffer.width(),
            height = buffer.height(),
            threshold = self.params.threshold.get(),
            "converted source"
        );

        let output = self.output.insert(RenderedOutput {
            buffer,
            params_version: self.params_version,
        });
        Ok(&output.buffer)
    }

    /// Returns the last converted output for preview, if any.
    pub fn output(&self) -> Option<&PixelBuffer> {
        self.output.as_ref().map(|o| &o.buffer)
    }

    /// Returns true if an output exists but the parameters have changed
    /// since it was rendered.
    pub fn is_output_stale(&self) -> bool {
        self.output
            .as_ref()
            .is_some_and(|o| o.params_version != self.params_version)
    }
}

impl<C: Decoder> PipelineState<C> {
    /// Decodes `bytes` and loads the result as the new source.
    ///
    /// On a decode failure the state is left unchanged.
    pub fn load_encoded(&mut self, bytes: &[u8]) -> Result<()> {
        let buffer = self.codec.decode(bytes)?;
        self.load_source(buffer);
        Ok(())
    }
}

impl<C: Encoder> PipelineState<C> {
    /// Encodes the last converted output.
    ///
    /// Fails with [`MaskError::NoOutputAvailable`] unless
    /// [`convert`](Self::convert) has run since the last source load.
    pub fn export_output(&self) -> Result<Vec<u8>> {
        let output = self.output.as_ref().ok_or(MaskError::NoOutputAvailable)?;
        if self.is_output_stale() {
            tracing::warn!("exporting output rendered with outdated parameters");
        }

        let bytes = self.codec.encode(&output.buffer)?;
        tracing::debug!(bytes = bytes.len(), "exported output");
        Ok(bytes)
    }
}

impl<C> Configurable for PipelineState<C> {
    /// Applies a profile as new parameters. Does not convert.
    fn apply_profile(&mut self, profile: &MaskProfile) {
        self.set_parameters(profile.to_parameters());
    }

    fn export_profile(&self) -> MaskProfile {
        self.params.into()
    }
}

// ============================================================================
// Tests
// ============================================================================
