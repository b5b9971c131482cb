//! Driving the grid renderer over every frame and assembling the output

use crate::io::configuration::MAX_PALETTE_COLORS;
use crate::io::encoder::{AnimationEncoder, Artifact, PaletteFrame, StillFormat, encode_still};
use crate::io::error::{Result, invalid_parameter};
use crate::io::quantize::{apply_palette, quantize};
use crate::io::source::Frame;
use crate::render::grid::GridRenderer;
use crate::render::observer::RenderObserver;
use image::{Rgb, RgbaImage};
use rand::Rng;

/// Encoded animation bytes with their shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAnimation {
    /// Complete encoded stream
    pub bytes: Vec<u8>,
    /// Number of frames written
    pub frame_count: usize,
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
}

/// Result of a successful render
#[derive(Debug, Clone)]
pub enum RenderOutput {
    /// Single stitched raster, unquantized
    Still(RgbaImage),
    /// Palette-quantized animation
    Animated(EncodedAnimation),
}

impl RenderOutput {
    /// Encode into a downloadable artifact
    ///
    /// Stills use `format` (JPEG is flattened onto `matte`); animations are
    /// already encoded and become `download.gif`.
    ///
    /// # Errors
    ///
    /// Returns an encode error if still encoding fails
    pub fn into_artifact(self, format: StillFormat, matte: Rgb<u8>) -> Result<Artifact> {
        match self {
            Self::Still(image) => encode_still(&image, format, matte),
            Self::Animated(animation) => Ok(Artifact::new("gif", animation.bytes)),
        }
    }
}

/// Render every frame and assemble the output
///
/// A single frame is returned as its raster. Several frames are rendered in
/// order, each quantized to its own palette of at most 256 colors and
/// written to an encoder created for the canvas size. Any failure discards
/// the partial animation. The observer's `render_completed` fires once the
/// output is complete.
///
/// # Errors
///
/// Returns an error if `frames` is empty, a frame cannot be rendered, or the
/// encoder fails
pub fn assemble<R, O, E, F>(
    renderer: &mut GridRenderer<'_>,
    frames: &[Frame],
    rng: &mut R,
    observer: &mut O,
    make_encoder: F,
) -> Result<RenderOutput>
where
    R: Rng + ?Sized,
    O: RenderObserver + ?Sized,
    E: AnimationEncoder,
    F: FnOnce(u32, u32) -> Result<E>,
{
    let total = frames.len();
    let (first, rest) = frames
        .split_first()
        .ok_or_else(|| invalid_parameter("frames", &0, &"at least one frame is required"))?;

    if rest.is_empty() {
        renderer.render(first, total, rng, observer)?;
        observer.render_completed();
        return Ok(RenderOutput::Still(renderer.take_canvas()));
    }

    let geometry = renderer.geometry(first.width(), first.height())?;
    let mut encoder = make_encoder(geometry.width, geometry.height)?;

    for frame in frames {
        let canvas = renderer.render(frame, total, rng, observer)?;
        let palette = quantize(canvas, MAX_PALETTE_COLORS);
        let indices = apply_palette(canvas, &palette);
        log::debug!(
            "Frame {} quantized to {} colors",
            frame.index,
            palette.len()
        );
        encoder.write_frame(&PaletteFrame {
            width: canvas.width(),
            height: canvas.height(),
            indices,
            palette,
            delay_ms: frame.delay_ms,
        })?;
    }

    let bytes = encoder.finish()?;
    observer.render_completed();

    Ok(RenderOutput::Animated(EncodedAnimation {
        bytes,
        frame_count: total,
        width: geometry.width,
        height: geometry.height,
    }))
}
