//! Compositing operations over RGBA rasters
//!
//! Implements the separable blend modes and Porter-Duff operators of W3C
//! Compositing and Blending Level 1, on straight (non-premultiplied)
//! 8-bit RGBA pixels. Each drawing operation consumes a buffer and returns
//! it, so a pipeline of stages reads as a chain of moves.

use image::{Rgba, RgbaImage};

/// Compositing operation used when drawing a source onto a backdrop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositeOp {
    /// Source drawn over the backdrop
    #[default]
    SourceOver,
    /// Backdrop × source; darkens
    Multiply,
    /// Inverse multiply of the inverses; lightens
    Screen,
    /// Multiply or screen depending on the backdrop
    Overlay,
    /// Gentle darken or lighten depending on the source
    SoftLight,
    /// Keep the backdrop only where the source is opaque
    DestinationIn,
}

impl CompositeOp {
    /// Blend a single color channel, values in `0.0..=1.0`
    ///
    /// `backdrop` is the existing color, `source` the color being drawn.
    pub fn blend_channel(self, backdrop: f32, source: f32) -> f32 {
        match self {
            Self::SourceOver | Self::DestinationIn => source,
            Self::Multiply => backdrop * source,
            Self::Screen => screen(backdrop, source),
            Self::Overlay => {
                // Hard light with the layers swapped
                if backdrop <= 0.5 {
                    2.0 * backdrop * source
                } else {
                    screen(source, 2.0f32.mul_add(backdrop, -1.0))
                }
            }
            Self::SoftLight => {
                if source <= 0.5 {
                    backdrop - (2.0f32.mul_add(-source, 1.0)) * backdrop * (1.0 - backdrop)
                } else {
                    let d = if backdrop <= 0.25 {
                        (16.0f32.mul_add(backdrop, -12.0) * backdrop + 4.0) * backdrop
                    } else {
                        backdrop.sqrt()
                    };
                    2.0f32.mul_add(source, -1.0).mul_add(d - backdrop, backdrop)
                }
            }
        }
    }

    /// Composite one source pixel onto one backdrop pixel
    pub fn composite(self, backdrop: Rgba<u8>, source: Rgba<u8>) -> Rgba<u8> {
        let b = to_unit(backdrop);
        let s = to_unit(source);
        let [cb_r, cb_g, cb_b, alpha_b] = b;
        let [cs_r, cs_g, cs_b, alpha_s] = s;

        if self == Self::DestinationIn {
            return from_unit([cb_r, cb_g, cb_b, alpha_b * alpha_s]);
        }

        let alpha_o = alpha_s + alpha_b * (1.0 - alpha_s);
        if alpha_o <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }

        let channel = |cb: f32, cs: f32| -> f32 {
            let mixed = self.blend_channel(cb, cs);
            (alpha_s * (1.0 - alpha_b) * cs
                + alpha_s * alpha_b * mixed
                + (1.0 - alpha_s) * alpha_b * cb)
                / alpha_o
        };

        from_unit([
            channel(cb_r, cs_r),
            channel(cb_g, cs_g),
            channel(cb_b, cs_b),
            alpha_o,
        ])
    }
}

fn screen(backdrop: f32, source: f32) -> f32 {
    backdrop + source - backdrop * source
}

fn to_unit(pixel: Rgba<u8>) -> [f32; 4] {
    let Rgba([r, g, b, a]) = pixel;
    [
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        f32::from(a) / 255.0,
    ]
}

fn from_unit(channels: [f32; 4]) -> Rgba<u8> {
    let [r, g, b, a] = channels.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    if a == 0 {
        Rgba([0, 0, 0, 0])
    } else {
        Rgba([r, g, b, a])
    }
}

/// Fill the whole buffer with a flat color using `op`
#[must_use]
pub fn fill(mut buffer: RgbaImage, color: Rgba<u8>, op: CompositeOp) -> RgbaImage {
    for pixel in buffer.pixels_mut() {
        *pixel = op.composite(*pixel, color);
    }
    buffer
}

/// Draw `source` at the buffer origin using `op`
///
/// Buffer pixels outside `source` see a transparent source, which clears them
/// under [`CompositeOp::DestinationIn`] and leaves them untouched otherwise.
#[must_use]
pub fn draw(mut buffer: RgbaImage, source: &RgbaImage, op: CompositeOp) -> RgbaImage {
    for (x, y, pixel) in buffer.enumerate_pixels_mut() {
        let src = source
            .get_pixel_checked(x, y)
            .copied()
            .unwrap_or(Rgba([0, 0, 0, 0]));
        *pixel = op.composite(*pixel, src);
    }
    buffer
}

/// Draw `source` onto `canvas` at a signed offset with source-over, clipping at the edges
pub fn blit(canvas: &mut RgbaImage, source: &RgbaImage, x: i64, y: i64) {
    let (canvas_width, canvas_height) = canvas.dimensions();

    for (sx, sy, src) in source.enumerate_pixels() {
        if src.0[3] == 0 {
            continue;
        }
        let dest_x = x + i64::from(sx);
        let dest_y = y + i64::from(sy);
        let (Ok(dest_x), Ok(dest_y)) = (u32::try_from(dest_x), u32::try_from(dest_y)) else {
            continue;
        };
        if dest_x >= canvas_width || dest_y >= canvas_height {
            continue;
        }
        if let Some(dst) = canvas.get_pixel_mut_checked(dest_x, dest_y) {
            *dst = CompositeOp::SourceOver.composite(*dst, *src);
        }
    }
}

/// Replace every pixel of the buffer with `color`
pub fn flood(canvas: &mut RgbaImage, color: Rgba<u8>) {
    for pixel in canvas.pixels_mut() {
        *pixel = color;
    }
}
