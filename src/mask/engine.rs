//! Whole-buffer masking.

use rayon::prelude::*;

use super::classify::classify;
use super::{MaskParameters, Threshold};
use crate::buffer::{CHANNELS, PixelBuffer, Rgba8};
use crate::error::{MaskError, Mismatch, Result};

/// Images with at least this many pixels are processed in parallel.
pub const DEFAULT_PARALLEL_MIN_PIXELS: usize = 64 * 1024;

/// Pixels handed to a rayon task at a time.
const CHUNK_PIXELS: usize = 4096;

// ============================================================================
// MaskingEngine
// ============================================================================

/// Applies [`MaskParameters`] to a whole [`PixelBuffer`].
///
/// Every output pixel depends only on the source pixel at the same position,
/// so the buffer is split into independent chunks and, for large images,
/// processed on the rayon thread pool. Sequential and parallel runs produce
/// identical bytes.
///
/// # Example
///
/// ```
/// use mask_renderer::{MaskParameters, MaskingEngine, PixelBuffer};
///
/// let source = PixelBuffer::from_raw(2, 1, vec![10, 10, 10, 255, 250, 250, 250, 255])?;
/// let output = MaskingEngine::new().apply(&source, &MaskParameters::default());
///
/// assert_eq!(output.get_pixel(0, 0)?, [200, 150, 35, 128]);
/// assert_eq!(output.get_pixel(1, 0)?, [0, 0, 0, 0]);
/// # Ok::<(), mask_renderer::MaskError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MaskingEngine {
    parallel_min_pixels: usize,
}

impl Default for MaskingEngine {
    fn default() -> Self {
        Self {
            parallel_min_pixels: DEFAULT_PARALLEL_MIN_PIXELS,
        }
    }
}

impl MaskingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pixel count from which work is spread across threads.
    ///
    /// `0` always runs in parallel, `usize::MAX` never does.
    pub fn with_parallel_min_pixels(mut self, pixels: usize) -> Self {
        self.parallel_min_pixels = pixels;
        self
    }

    /// Masks `source` into a freshly allocated buffer of the same size.
    pub fn apply(&self, source: &PixelBuffer, params: &MaskParameters) -> PixelBuffer {
        let mut output = source.blank_like();
        self.run(source.as_raw(), output.as_raw_mut(), params);
        output
    }

    /// Masks `source` into an existing buffer, reusing its allocation.
    ///
    /// Fails with [`MaskError::DimensionMismatch`] if `output` is not the
    /// same size as `source`; `output` is left untouched in that case.
    pub fn apply_into(
        &self,
        source: &PixelBuffer,
        params: &MaskParameters,
        output: &mut PixelBuffer,
    ) -> Result<()> {
        if !source.same_size(output) {
            return Err(MaskError::DimensionMismatch(Mismatch::Size {
                expected: source.dimensions(),
                actual: output.dimensions(),
            }));
        }

        self.run(source.as_raw(), output.as_raw_mut(), params);
        Ok(())
    }

    fn run(&self, src: &[u8], dst: &mut [u8], params: &MaskParameters) {
        debug_assert_eq!(src.len(), dst.len());

        // Resolve both colors to bytes once, not per pixel.
        let threshold = params.threshold;
        let mask = params.mask_color.to_rgba8();
        let background = params.background_color.to_rgba8();

        let pixels = src.len() / CHANNELS;
        let parallel = pixels >= self.parallel_min_pixels;
        tracing::trace!(pixels, parallel, threshold = threshold.get(), "masking buffer");

        if parallel {
            let chunk_bytes = CHUNK_PIXELS * CHANNELS;
            dst.par_chunks_mut(chunk_bytes)
                .zip(src.par_chunks(chunk_bytes))
                .for_each(|(out, inp)| recolor_run(inp, out, threshold, mask, background));
        } else {
            recolor_run(src, dst, threshold, mask, background);
        }
    }
}

/// Masks `source` with the default engine settings.
pub fn apply_mask(source: &PixelBuffer, params: &MaskParameters) -> PixelBuffer {
    MaskingEngine::default().apply(source, params)
}

// ============================================================================
// Per-pixel kernel
// ============================================================================

/// Writes the class color for one source pixel into `dst`.
///
/// Brightness is always taken from the source pixel, never from previously
/// written output.
#[inline]
pub fn recolor_pixel(
    src: &Rgba8,
    dst: &mut Rgba8,
    threshold: Threshold,
    mask: Rgba8,
    background: Rgba8,
) {
    *dst = if classify(src, threshold) { mask } else { background };
}

fn recolor_run(
    src: &[u8],
    dst: &mut [u8],
    threshold: Threshold,
    mask: Rgba8,
    background: Rgba8,
) {
    let (src, _) = src.as_chunks::<CHANNELS>();
    let (dst, _) = dst.as_chunks_mut::<CHANNELS>();
    for (inp, out) in src.iter().zip(dst) {
        recolor_pixel(inp, out, threshold, mask, background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Color;
    use proptest::prelude::*;

    fn buffer_from(pixels: &[Rgba8], width: u32) -> PixelBuffer {
        let height = pixels.len() as u32 / width;
        PixelBuffer::from_raw(width, height, pixels.concat()).unwrap()
    }

    #[test]
    fn two_pixel_scenario() {
        let source = buffer_from(&[[10, 10, 10, 255], [250, 250, 250, 255]], 2);
        let output = apply_mask(&source, &MaskParameters::default());

        let pixels: Vec<_> = output.pixels().collect();
        assert_eq!(pixels, vec![[200, 150, 35, 128], [0, 0, 0, 0]]);
    }

    #[test]
    fn source_is_not_mutated() {
        let source = buffer_from(&[[10, 10, 10, 255], [250, 250, 250, 255]], 2);
        let before = source.clone();
        let _ = apply_mask(&source, &MaskParameters::default());
        assert_eq!(source, before);
    }

    #[test]
    fn boundary_pixel_is_masked() {
        // 68 + 68 + 69 == 205, 68 + 69 + 69 == 206
        let source = buffer_from(&[[68, 68, 69, 255], [68, 69, 69, 255]], 2);
        let output = apply_mask(&source, &MaskParameters::default());

        assert_eq!(output.get_pixel(0, 0).unwrap(), [200, 150, 35, 128]);
        assert_eq!(output.get_pixel(1, 0).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn extremes() {
        let source = buffer_from(
            &[[0, 0, 0, 0], [0, 0, 0, 255], [1, 0, 0, 255], [255, 255, 255, 255]],
            2,
        );
        let mask = Color::opaque(9, 9, 9);
        let params = MaskParameters::default()
            .with_mask_color(mask)
            .with_background_color(Color::TRANSPARENT);

        let zero = apply_mask(&source, &params.with_threshold(Threshold::MIN));
        let classes: Vec<bool> = zero.pixels().map(|p| p == mask.to_rgba8()).collect();
        assert_eq!(classes, vec![true, true, false, false]);

        let max = apply_mask(&source, &params.with_threshold(Threshold::MAX));
        assert!(max.pixels().all(|p| p == mask.to_rgba8()));
    }

    #[test]
    fn apply_into_reuses_matching_buffer() {
        let source = buffer_from(&[[10, 10, 10, 255], [250, 250, 250, 255]], 2);
        let mut output = PixelBuffer::new(2, 1).unwrap();
        MaskingEngine::new()
            .apply_into(&source, &MaskParameters::default(), &mut output)
            .unwrap();
        assert_eq!(output, apply_mask(&source, &MaskParameters::default()));
    }

    #[test]
    fn apply_into_rejects_mismatched_buffer() {
        let source = buffer_from(&[[10, 10, 10, 255], [250, 250, 250, 255]], 2);
        // Same byte length, different shape.
        let mut output = PixelBuffer::new(1, 2).unwrap();
        output.set_pixel(0, 0, [1, 2, 3, 4]).unwrap();
        let before = output.clone();

        let err = MaskingEngine::new()
            .apply_into(&source, &MaskParameters::default(), &mut output)
            .unwrap_err();
        assert!(matches!(
            err,
            MaskError::DimensionMismatch(Mismatch::Size { .. })
        ));
        assert_eq!(
            err.to_string(),
            "dimension mismatch: expected a 2x1 buffer, got 1x2"
        );
        assert_eq!(output, before);
    }

    fn arb_image() -> impl Strategy<Value = (u32, Vec<u8>)> {
        (1u32..16, 1u32..16).prop_flat_map(|(w, h)| {
            (Just(w), proptest::collection::vec(any::<u8>(), (w * h * 4) as usize))
        })
    }

    fn arb_params() -> impl Strategy<Value = MaskParameters> {
        (0i32..=765, any::<[u8; 3]>(), 0.0f32..=1.0, any::<[u8; 3]>(), 0.0f32..=1.0).prop_map(
            |(t, m, ma, b, ba)| {
                MaskParameters::new(
                    Threshold::new(t),
                    Color::new(m[0], m[1], m[2], ma),
                    Color::new(b[0], b[1], b[2], ba),
                )
            },
        )
    }

    proptest! {
        #[test]
        fn every_pixel_gets_its_class_color((w, raw) in arb_image(), params in arb_params()) {
            let source = PixelBuffer::from_raw(w, raw.len() as u32 / (w * 4), raw).unwrap();
            let output = apply_mask(&source, &params);

            for (src, out) in source.pixels().zip(output.pixels()) {
                let sum = src[0] as u16 + src[1] as u16 + src[2] as u16;
                let expected = if sum <= params.threshold.get() {
                    params.mask_color.to_rgba8()
                } else {
                    params.background_color.to_rgba8()
                };
                prop_assert_eq!(out, expected);
            }
        }

        #[test]
        fn parallel_matches_sequential((w, raw) in arb_image(), params in arb_params()) {
            let source = PixelBuffer::from_raw(w, raw.len() as u32 / (w * 4), raw).unwrap();
            let sequential = MaskingEngine::new()
                .with_parallel_min_pixels(usize::MAX)
                .apply(&source, &params);
            let parallel = MaskingEngine::new()
                .with_parallel_min_pixels(0)
                .apply(&source, &params);
            prop_assert_eq!(sequential, parallel);
        }

        #[test]
        fn traversal_order_does_not_matter((w, raw) in arb_image(), params in arb_params()) {
            let source = PixelBuffer::from_raw(w, raw.len() as u32 / (w * 4), raw).unwrap();
            let expected = apply_mask(&source, &params);

            // Walk the pixels back to front.
            let mask = params.mask_color.to_rgba8();
            let background = params.background_color.to_rgba8();
            let mut reversed = PixelBuffer::new(source.width(), source.height()).unwrap();
            let (src, _) = source.as_raw().as_chunks::<CHANNELS>();
            let (dst, _) = reversed.as_raw_mut().as_chunks_mut::<CHANNELS>();
            for (inp, out) in src.iter().zip(dst).rev() {
                recolor_pixel(inp, out, params.threshold, mask, background);
            }
            prop_assert_eq!(reversed, expected);
        }
    }

    #[test]
    fn large_image_takes_parallel_path() {
        let side = 300u32; // 90_000 pixels, above the default cut-over
        let raw: Vec<u8> = (0..side * side * 4).map(|i| (i % 251) as u8).collect();
        let source = PixelBuffer::from_raw(side, side, raw).unwrap();
        let params = MaskParameters::default();

        let default_engine = apply_mask(&source, &params);
        let sequential = MaskingEngine::new()
            .with_parallel_min_pixels(usize::MAX)
            .apply(&source, &params);
        assert_eq!(default_engine, sequential);
    }
}
