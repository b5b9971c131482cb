//! Recoloring of one stitch tile for one source pixel
//!
//! A patch is built in four fixed stages on a scratch buffer the size of the
//! tile:
//!
//! 1. the tile is drawn as-is, giving the stitch shape and its own alpha
//! 2. the source color is filled over everything with the texture's blend mode
//! 3. a gray near mid-level is filled with soft light to vary brightness
//! 4. the tile is drawn again with destination-in, cutting the result back
//!    to the stitch silhouette
//!
//! The output therefore always has the tile's dimensions and alpha.

use crate::io::configuration::{VARY_CENTER, VARY_SPREAD};
use crate::render::blend::{CompositeOp, draw, fill};
use image::{Rgb, Rgba, RgbaImage};
use rand::Rng;

/// Draw the per-cell brightness gray, uniform in `128 ± 25`
pub fn draw_vary<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    VARY_CENTER + rng.random_range(-VARY_SPREAD..VARY_SPREAD)
}

/// Run the four recoloring stages on `scratch`
///
/// `scratch` is resized to the tile when needed and cleared otherwise, so the
/// caller can hand back the previous patch to avoid an allocation per cell.
#[must_use]
pub fn recolor(
    scratch: RgbaImage,
    tile: &RgbaImage,
    color: Rgb<u8>,
    blend_mode: CompositeOp,
    vary: f32,
) -> RgbaImage {
    let Rgb([r, g, b]) = color;
    let gray = vary.round().clamp(0.0, 255.0) as u8;

    let base = draw(reset(scratch, tile), tile, CompositeOp::SourceOver);
    let tinted = fill(base, Rgba([r, g, b, 255]), blend_mode);
    let varied = fill(tinted, Rgba([gray, gray, gray, 255]), CompositeOp::SoftLight);
    draw(varied, tile, CompositeOp::DestinationIn)
}

fn reset(mut scratch: RgbaImage, tile: &RgbaImage) -> RgbaImage {
    if scratch.dimensions() == tile.dimensions() {
        for pixel in scratch.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        scratch
    } else {
        RgbaImage::new(tile.width(), tile.height())
    }
}

/// Recolors tiles into an owned, reused scratch buffer
#[derive(Debug, Default)]
pub struct PatchCompositor {
    scratch: RgbaImage,
}

impl PatchCompositor {
    /// Create a compositor with an empty scratch buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Recolor `tile` toward `color` with a freshly drawn brightness variation
    pub fn composite<R: Rng + ?Sized>(
        &mut self,
        tile: &RgbaImage,
        color: Rgb<u8>,
        blend_mode: CompositeOp,
        rng: &mut R,
    ) -> &RgbaImage {
        let vary = draw_vary(rng);
        self.composite_with_vary(tile, color, blend_mode, vary)
    }

    /// Recolor `tile` with a fixed brightness variation
    pub fn composite_with_vary(
        &mut self,
        tile: &RgbaImage,
        color: Rgb<u8>,
        blend_mode: CompositeOp,
        vary: f32,
    ) -> &RgbaImage {
        let scratch = std::mem::take(&mut self.scratch);
        self.scratch = recolor(scratch, tile, color, blend_mode, vary);
        &self.scratch
    }
}
