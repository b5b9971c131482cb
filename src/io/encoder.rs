//! Still image and animated GIF encoding into downloadable artifacts

use crate::io::configuration::{DOWNLOAD_STEM, JPEG_QUALITY, MIN_FRAME_DELAY_MS};
use crate::io::error::{Result, encode_error};
use crate::io::quantize::Palette;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage, RgbaImage};
use std::borrow::Cow;
use std::io::Cursor;

/// One palette-indexed animation frame
#[derive(Debug, Clone)]
pub struct PaletteFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Palette index of every pixel, row-major
    pub indices: Vec<u8>,
    /// Colors referenced by `indices`
    pub palette: Palette,
    /// Display duration in milliseconds
    pub delay_ms: u32,
}

/// Sink for indexed animation frames
///
/// Frames arrive in display order; `finish` yields the complete byte stream.
pub trait AnimationEncoder {
    /// Append one frame
    ///
    /// # Errors
    ///
    /// Returns an encode error if the frame cannot be written
    fn write_frame(&mut self, frame: &PaletteFrame) -> Result<()>;

    /// Finalize the stream and return its bytes
    ///
    /// # Errors
    ///
    /// Returns an encode error if the trailer cannot be written
    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

/// Looping GIF encoder writing into memory
pub struct GifAnimationEncoder {
    encoder: gif::Encoder<Vec<u8>>,
    width: u16,
    height: u16,
    frames_written: usize,
}

impl std::fmt::Debug for GifAnimationEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifAnimationEncoder")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("frames_written", &self.frames_written)
            .finish_non_exhaustive()
    }
}

impl GifAnimationEncoder {
    /// Start an infinitely looping GIF with the given logical screen size
    ///
    /// # Errors
    ///
    /// Returns an encode error if a dimension exceeds the 65535 pixel GIF
    /// limit or the header cannot be written
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let too_large =
            |_| encode_error("GIF", &format!("{width}x{height} exceeds 65535x65535"));
        let width = u16::try_from(width).map_err(too_large)?;
        let height = u16::try_from(height).map_err(too_large)?;

        let mut encoder =
            gif::Encoder::new(Vec::new(), width, height, &[]).map_err(|e| encode_error("GIF", &e))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| encode_error("GIF", &e))?;

        Ok(Self {
            encoder,
            width,
            height,
            frames_written: 0,
        })
    }

    /// Number of frames written so far
    pub const fn frames_written(&self) -> usize {
        self.frames_written
    }
}

/// Convert a frame delay to GIF centiseconds, never below the viewer minimum
pub fn delay_centiseconds(delay_ms: u32) -> u16 {
    if delay_ms == 0 {
        log::warn!("Frame has no delay; using {MIN_FRAME_DELAY_MS}ms");
    }
    u16::try_from(delay_ms.max(MIN_FRAME_DELAY_MS) / 10).unwrap_or(u16::MAX)
}

impl AnimationEncoder for GifAnimationEncoder {
    fn write_frame(&mut self, frame: &PaletteFrame) -> Result<()> {
        if (frame.width, frame.height) != (u32::from(self.width), u32::from(self.height)) {
            return Err(encode_error(
                "GIF",
                &format!(
                    "frame is {}x{} but the animation is {}x{}",
                    frame.width, frame.height, self.width, self.height
                ),
            ));
        }
        if frame.indices.len() != usize::from(self.width) * usize::from(self.height) {
            return Err(encode_error(
                "GIF",
                &format!("frame has {} indices", frame.indices.len()),
            ));
        }
        if frame.palette.is_empty() {
            return Err(encode_error("GIF", &"frame palette is empty"));
        }

        let gif_frame = gif::Frame {
            width: self.width,
            height: self.height,
            delay: delay_centiseconds(frame.delay_ms),
            dispose: gif::DisposalMethod::Background,
            transparent: frame.palette.transparent_index(),
            palette: Some(frame.palette.to_rgb_bytes()),
            buffer: Cow::Borrowed(&frame.indices),
            ..gif::Frame::default()
        };
        self.encoder
            .write_frame(&gif_frame)
            .map_err(|e| encode_error("GIF", &e))?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.encoder
            .into_inner()
            .map_err(|e| encode_error("GIF", &e))
    }
}

/// Still output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StillFormat {
    /// Lossless PNG keeping transparency
    #[default]
    Png,
    /// JPEG at fixed quality, flattened onto a matte color
    Jpeg,
}

impl StillFormat {
    /// File extension of the format
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Encoded render output ready to be saved or served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name, `download.<ext>`
    pub file_name: String,
    /// Encoded bytes
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Wrap encoded bytes under the download name for `extension`
    pub fn new(extension: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("{DOWNLOAD_STEM}.{extension}"),
            bytes,
        }
    }
}

/// Blend every pixel over an opaque matte color
pub fn flatten(image: &RgbaImage, matte: Rgb<u8>) -> RgbImage {
    let Rgb(matte) = matte;
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = f32::from(a) / 255.0;
        let mix = |channel: u8, background: u8| -> u8 {
            f32::from(channel)
                .mul_add(alpha, f32::from(background) * (1.0 - alpha))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb([mix(r, matte[0]), mix(g, matte[1]), mix(b, matte[2])])
    })
}

/// Encode a still raster as PNG, or as JPEG at quality 80 flattened onto `matte`
///
/// # Errors
///
/// Returns an encode error if the image encoder fails
pub fn encode_still(image: &RgbaImage, format: StillFormat, matte: Rgb<u8>) -> Result<Artifact> {
    let mut bytes = Vec::new();
    match format {
        StillFormat::Png => image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| encode_error("PNG", &e))?,
        StillFormat::Jpeg => JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
            .encode_image(&flatten(image, matte))
            .map_err(|e| encode_error("JPEG", &e))?,
    }
    Ok(Artifact::new(format.extension(), bytes))
}
