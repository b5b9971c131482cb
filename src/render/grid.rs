//! Stitching a frame's pixel grid onto the output canvas
//!
//! Every source pixel maps to one grid cell. A cell's tile is placed at
//! `(x * offset_x, y * offset_y)` where the offsets are the scaled tile size
//! adjusted by the texture's gaps; negative gaps make neighbouring stitches
//! overlap. The canvas is sized so the last tile sits flush against the right
//! and bottom edges.
//!
//! Background tiles use their own, ungapped stride of `tile_size * scale`.
//! The two grids are independent and need not line up.

use crate::io::error::{Result, invalid_parameter};
use crate::io::source::Frame;
use crate::render::blend::{blit, flood};
use crate::render::observer::RenderObserver;
use crate::render::patch::PatchCompositor;
use crate::render::picker::TileSet;
use crate::texture::assets::TextureAssets;
use crate::texture::catalog::TextureConfig;
use bitvec::prelude::{BitSlice, BitVec};
use image::{Rgb, Rgba, RgbaImage};
use num_traits::ToPrimitive;
use rand::Rng;

/// Placement parameters of a frame's cells on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Horizontal distance between neighbouring cells
    pub offset_x: f64,
    /// Vertical distance between neighbouring cells
    pub offset_y: f64,
    /// Horizontal distance between background tiles
    pub background_stride_x: f64,
    /// Vertical distance between background tiles
    pub background_stride_y: f64,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
}

impl CanvasGeometry {
    /// Compute the canvas layout for a frame
    ///
    /// `tile_size` is the unscaled size of the texture's first tile.
    /// `canvas = frame * offset + tile * scale - offset` along each axis.
    ///
    /// # Errors
    ///
    /// Returns an error if a gap swallows the whole tile or the canvas would be
    /// empty or too large
    pub fn compute(
        frame_size: (u32, u32),
        tile_size: (u32, u32),
        gaps: (i32, i32),
        scale: f64,
    ) -> Result<Self> {
        let (frame_width, frame_height) = frame_size;
        let (tile_width, tile_height) = tile_size;

        let offset_x = (f64::from(tile_width) + f64::from(gaps.0)) * scale;
        let offset_y = (f64::from(tile_height) + f64::from(gaps.1)) * scale;
        if offset_x <= 0.0 || offset_y <= 0.0 {
            return Err(invalid_parameter(
                "gap",
                &format!("{}x{}", gaps.0, gaps.1),
                &format!("gaps must leave a positive stride for {tile_width}x{tile_height} tiles"),
            ));
        }

        let span = |frame: u32, offset: f64, tile: u32| -> Result<u32> {
            let length = f64::from(frame).mul_add(offset, f64::from(tile) * scale) - offset;
            length
                .round()
                .to_u32()
                .filter(|&pixels| pixels > 0)
                .ok_or_else(|| {
                    invalid_parameter("canvas", &length, &"canvas size must be a positive u32")
                })
        };

        Ok(Self {
            offset_x,
            offset_y,
            background_stride_x: f64::from(tile_width) * scale,
            background_stride_y: f64::from(tile_height) * scale,
            width: span(frame_width, offset_x, tile_width)?,
            height: span(frame_height, offset_y, tile_height)?,
        })
    }

    /// Top-left canvas position of the foreground tile for cell `(x, y)`
    pub fn cell_origin(&self, x: u32, y: u32) -> (i64, i64) {
        (
            position(x, self.offset_x),
            position(y, self.offset_y),
        )
    }

    /// Top-left canvas position of the background tile for cell `(x, y)`
    pub fn background_origin(&self, x: u32, y: u32) -> (i64, i64) {
        (
            position(x, self.background_stride_x),
            position(y, self.background_stride_y),
        )
    }
}

fn position(index: u32, stride: f64) -> i64 {
    (f64::from(index) * stride).round().to_i64().unwrap_or(i64::MAX)
}

/// Whether a source pixel is left unstitched
///
/// Transparent pixels are always skipped; pure white ones only when the
/// texture asks for it.
pub fn should_skip(pixel: Rgba<u8>, skip_white: bool) -> bool {
    let Rgba([r, g, b, a]) = pixel;
    a == 0 || (skip_white && r == 255 && g == 255 && b == 255)
}

/// Renders frames of one texture onto a reused canvas
///
/// Owns the scratch buffer and output canvas of a render. Both are reset at
/// the start of every frame, so one renderer serves a whole animation but
/// must not be shared between renders.
#[derive(Debug)]
pub struct GridRenderer<'c> {
    config: &'c TextureConfig,
    tile_size: (u32, u32),
    tiles: TileSet,
    backgrounds: Option<TileSet>,
    scale: f64,
    background_color: Option<Rgb<u8>>,
    compositor: PatchCompositor,
    canvas: RgbaImage,
    drawn: BitVec,
}

impl<'c> GridRenderer<'c> {
    /// Prepare a renderer, scaling the texture's tiles once
    ///
    /// # Errors
    ///
    /// Returns an error if the scale leaves a tile without pixels
    pub fn new(
        config: &'c TextureConfig,
        assets: &TextureAssets,
        scale: f64,
        background_color: Option<Rgb<u8>>,
    ) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(invalid_parameter(
                "render_scale",
                &scale,
                &"scale must be a positive finite number",
            ));
        }

        let backgrounds = assets
            .backgrounds
            .as_ref()
            .map(|set| set.scaled(scale))
            .transpose()?;

        Ok(Self {
            config,
            tile_size: assets.tiles.first().dimensions(),
            tiles: assets.tiles.scaled(scale)?,
            backgrounds,
            scale,
            background_color,
            compositor: PatchCompositor::new(),
            canvas: RgbaImage::default(),
            drawn: BitVec::new(),
        })
    }

    /// Canvas layout for a frame of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is degenerate, see [`CanvasGeometry::compute`]
    pub fn geometry(&self, frame_width: u32, frame_height: u32) -> Result<CanvasGeometry> {
        CanvasGeometry::compute(
            (frame_width, frame_height),
            self.tile_size,
            (self.config.x_gap, self.config.y_gap),
            self.scale,
        )
    }

    /// Stitch one frame and return the finished canvas
    ///
    /// The canvas is cleared (or flood-filled with the background color),
    /// covered with background tiles if the texture has any, and then every
    /// cell that is not skipped receives a freshly picked and recolored tile.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas layout is degenerate
    pub fn render<R, O>(
        &mut self,
        frame: &Frame,
        total_frames: usize,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<&RgbaImage>
    where
        R: Rng + ?Sized,
        O: RenderObserver + ?Sized,
    {
        let (frame_width, frame_height) = frame.image.dimensions();
        let geometry = self.geometry(frame_width, frame_height)?;

        self.reset_canvas(&geometry, frame_width as usize * frame_height as usize);
        self.draw_background(&geometry, frame_width, frame_height, rng);

        observer.frame_started(frame.index, total_frames, frame_height);

        let blend_mode = self.config.blend_mode;
        let skip_white = self.config.skip_white;
        let mut cell = 0usize;
        for (y, row) in frame.image.enumerate_rows() {
            for (x, _, pixel) in row {
                if !should_skip(*pixel, skip_white) {
                    let Rgba([r, g, b, _]) = *pixel;
                    let tile = self.tiles.pick(rng);
                    let patch = self.compositor.composite(tile, Rgb([r, g, b]), blend_mode, rng);
                    let (px, py) = geometry.cell_origin(x, y);
                    blit(&mut self.canvas, patch, px, py);
                    self.drawn.set(cell, true);
                }
                cell += 1;
            }
            observer.row_completed(frame.index, y);
        }

        log::debug!(
            "Frame {} stitched {} of {} cells onto a {}x{} canvas",
            frame.index,
            self.drawn.count_ones(),
            self.drawn.len(),
            geometry.width,
            geometry.height
        );
        observer.frame_completed(frame.index, total_frames);

        Ok(&self.canvas)
    }

    /// Cells that received a tile in the last rendered frame, row-major
    pub fn drawn_cells(&self) -> &BitSlice {
        &self.drawn
    }

    /// The canvas of the last rendered frame
    pub const fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Move the last canvas out, leaving an empty one behind
    pub fn take_canvas(&mut self) -> RgbaImage {
        std::mem::take(&mut self.canvas)
    }

    fn reset_canvas(&mut self, geometry: &CanvasGeometry, cells: usize) {
        let fill = self
            .background_color
            .map_or(Rgba([0, 0, 0, 0]), |Rgb([r, g, b])| Rgba([r, g, b, 255]));

        if self.canvas.dimensions() == (geometry.width, geometry.height) {
            flood(&mut self.canvas, fill);
        } else {
            self.canvas = RgbaImage::from_pixel(geometry.width, geometry.height, fill);
        }

        self.drawn.clear();
        self.drawn.resize(cells, false);
    }

    fn draw_background<R: Rng + ?Sized>(
        &mut self,
        geometry: &CanvasGeometry,
        frame_width: u32,
        frame_height: u32,
        rng: &mut R,
    ) {
        let Some(backgrounds) = &self.backgrounds else {
            return;
        };
        for y in 0..frame_height {
            for x in 0..frame_width {
                let (px, py) = geometry.background_origin(x, y);
                blit(&mut self.canvas, backgrounds.pick(rng), px, py);
            }
        }
    }
}
