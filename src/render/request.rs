//! Parameters of a single render pass

use crate::io::configuration::{DEFAULT_BACKGROUND_COLOR, DEFAULT_RENDER_SCALE, MAX_ALLOWED_PIXELS};
use crate::io::error::{Result, SweaterError};
use crate::io::source::{ImageRef, check_pixel_budget, validate_target};
use crate::texture::catalog::TextureKind;
use image::Rgb;

/// Everything needed to drive one render
///
/// Built per user action and left untouched for the duration of the render.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Source image or animation
    pub source: ImageRef,
    /// Decode every frame of the source instead of only the first
    pub animated: bool,
    /// Width of the source after scaling, in stitches
    pub target_width: u32,
    /// Height of the source after scaling, in stitches
    pub target_height: u32,
    /// Multiplier applied to tile size and spacing on the canvas
    pub render_scale: f64,
    /// Flood-fill the canvas before drawing
    pub background_enabled: bool,
    /// Color of the flood fill
    pub background_color: Rgb<u8>,
    /// Texture to stitch with
    pub texture: TextureKind,
    /// Largest accepted `target_width * target_height`
    pub max_pixels: u64,
}

impl RenderRequest {
    /// Create a still, unscaled request without background fill
    pub const fn new(source: ImageRef, texture: TextureKind, width: u32, height: u32) -> Self {
        Self {
            source,
            animated: false,
            target_width: width,
            target_height: height,
            render_scale: DEFAULT_RENDER_SCALE,
            background_enabled: false,
            background_color: Rgb(DEFAULT_BACKGROUND_COLOR),
            texture,
            max_pixels: MAX_ALLOWED_PIXELS,
        }
    }

    /// Mark the request as animated
    #[must_use]
    pub fn with_animation(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Set the render scale
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.render_scale = scale;
        self
    }

    /// Enable the background fill with the given color
    #[must_use]
    pub fn with_background(mut self, color: Rgb<u8>) -> Self {
        self.background_enabled = true;
        self.background_color = color;
        self
    }

    /// Override the pixel budget
    #[must_use]
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// Background fill color, if enabled
    pub const fn background(&self) -> Option<Rgb<u8>> {
        if self.background_enabled {
            Some(self.background_color)
        } else {
            None
        }
    }

    /// Number of source pixels the render will process
    pub const fn density(&self) -> u64 {
        self.target_width as u64 * self.target_height as u64
    }

    /// Check target size, render scale and pixel budget
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A target dimension is zero
    /// - The render scale is not a positive finite number
    /// - The density exceeds `max_pixels`
    pub fn validate(&self) -> Result<()> {
        validate_target(self.target_width, self.target_height)?;
        if !self.render_scale.is_finite() || self.render_scale <= 0.0 {
            return Err(SweaterError::Scale {
                width: self.target_width,
                height: self.target_height,
                reason: format!("render scale {} must be positive", self.render_scale),
            });
        }
        check_pixel_budget(self.target_width, self.target_height, self.max_pixels)?;
        Ok(())
    }
}
