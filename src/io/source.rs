//! Image references, frame decoding and source scaling
//!
//! A source is either one still image or the full frame sequence of an
//! animated GIF. Every frame is scaled independently to the requested target
//! size with nearest-neighbor sampling, which keeps pixel art crisp.

use crate::io::configuration::DEFAULT_FRAME_DELAY_MS;
use crate::io::error::{Result, SweaterError};
use crate::render::request::RenderRequest;
use image::codecs::gif::GifDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, RgbaImage};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::PathBuf;

/// Reference to an encoded image asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Image file on disk
    Path(PathBuf),
    /// Image bytes compiled into the binary
    Embedded {
        /// Asset name used in messages
        name: &'static str,
        /// Encoded image bytes
        bytes: &'static [u8],
    },
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Embedded { name, .. } => write!(f, "builtin:{name}"),
        }
    }
}

impl ImageRef {
    /// Decode the referenced image into RGBA pixels
    ///
    /// For animated containers only the first frame is returned.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the asset cannot be read or parsed
    pub fn decode(&self) -> Result<RgbaImage> {
        let decoded = match self {
            Self::Path(path) => image::open(path),
            Self::Embedded { bytes, .. } => image::load_from_memory(bytes),
        };
        decoded
            .map(|img| img.to_rgba8())
            .map_err(|source| self.decode_error(source))
    }

    /// Decode every frame of a GIF container
    ///
    /// # Errors
    ///
    /// Returns a decode error if the asset cannot be opened, is not a GIF, or
    /// contains no frames
    pub fn decode_frames(&self) -> Result<Vec<(RgbaImage, u32)>> {
        let frames = match self {
            Self::Path(path) => {
                let file = File::open(path).map_err(|e| SweaterError::FileSystem {
                    path: path.clone(),
                    operation: "open source",
                    source: e,
                })?;
                decode_gif(BufReader::new(file))
            }
            Self::Embedded { bytes, .. } => decode_gif(Cursor::new(*bytes)),
        }
        .map_err(|source| self.decode_error(source))?;

        if frames.is_empty() {
            return Err(self.decode_error(image::ImageError::Decoding(
                image::error::DecodingError::new(
                    image::error::ImageFormatHint::Exact(image::ImageFormat::Gif),
                    "animation contains no frames",
                ),
            )));
        }

        Ok(frames)
    }

    /// Read the pixel dimensions without decoding the whole image
    ///
    /// # Errors
    ///
    /// Returns a decode error if the header cannot be read
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        match self {
            Self::Path(path) => {
                image::image_dimensions(path).map_err(|source| self.decode_error(source))
            }
            Self::Embedded { .. } => self.decode().map(|img| img.dimensions()),
        }
    }

    /// Whether the asset is a GIF container
    pub fn is_gif(&self) -> bool {
        match self {
            Self::Path(path) => {
                image::ImageFormat::from_path(path).is_ok_and(|f| f == image::ImageFormat::Gif)
            }
            Self::Embedded { bytes, .. } => {
                image::guess_format(bytes).is_ok_and(|f| f == image::ImageFormat::Gif)
            }
        }
    }

    fn decode_error(&self, source: image::ImageError) -> SweaterError {
        SweaterError::Decode {
            asset: self.to_string(),
            source,
        }
    }
}

fn decode_gif<R: BufRead + Seek>(reader: R) -> image::ImageResult<Vec<(RgbaImage, u32)>> {
    let decoder = GifDecoder::new(reader)?;
    let frames = decoder.into_frames().collect_frames()?;
    Ok(frames
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = numer.checked_div(denom).unwrap_or(DEFAULT_FRAME_DELAY_MS);
            (frame.into_buffer(), delay_ms)
        })
        .collect())
}

/// One source frame after scaling
#[derive(Debug, Clone)]
pub struct Frame {
    /// Position in the source sequence
    pub index: usize,
    /// Scaled pixels
    pub image: RgbaImage,
    /// Display duration carried through to the encoder
    pub delay_ms: u32,
}

impl Frame {
    /// Wrap a raster as a frame
    pub const fn new(index: usize, image: RgbaImage, delay_ms: u32) -> Self {
        Self {
            index,
            image,
            delay_ms,
        }
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Reject target sizes with a zero dimension
///
/// # Errors
///
/// Returns a scale error if either dimension is zero
pub fn validate_target(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(SweaterError::Scale {
            width,
            height,
            reason: "target dimensions must be positive".to_string(),
        });
    }
    Ok(())
}

/// Compute the pixel density of a target size and enforce the budget
///
/// A density equal to `limit` is accepted.
///
/// # Errors
///
/// Returns `PixelBudgetExceeded` when `width * height > limit`
pub fn check_pixel_budget(width: u32, height: u32, limit: u64) -> Result<u64> {
    let density = u64::from(width) * u64::from(height);
    if density > limit {
        return Err(SweaterError::PixelBudgetExceeded {
            limit,
            actual: density,
        });
    }
    Ok(density)
}

/// Fill in a missing target dimension from the source aspect ratio
///
/// With neither dimension given the source size is kept.
pub fn resolve_target_size(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    let (source_width, source_height) = source;
    let scaled = |value: u32, numerator: u32, denominator: u32| -> u32 {
        if denominator == 0 {
            return value;
        }
        let result = (u64::from(value) * u64::from(numerator) + u64::from(denominator) / 2)
            / u64::from(denominator);
        u32::try_from(result.max(1)).unwrap_or(u32::MAX)
    };

    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, scaled(w, source_height, source_width)),
        (None, Some(h)) => (scaled(h, source_width, source_height), h),
        (None, None) => (source_width, source_height),
    }
}

fn scale_to(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        image.clone()
    } else {
        imageops::resize(image, width, height, FilterType::Nearest)
    }
}

/// Load the request's source as a list of scaled frames
///
/// Target size and pixel budget are validated before anything is decoded.
/// A still request always yields exactly one frame; an animated request yields
/// every frame of the container in order.
///
/// # Errors
///
/// Returns an error if:
/// - The target size has a zero dimension
/// - The target density exceeds the request's pixel budget
/// - The source cannot be decoded
pub fn load_frames(request: &RenderRequest) -> Result<Vec<Frame>> {
    request.validate()?;
    let (width, height) = (request.target_width, request.target_height);

    if request.animated {
        let decoded = request.source.decode_frames()?;
        log::debug!(
            "Decoded {} frames from {}, scaling to {width}x{height}",
            decoded.len(),
            request.source
        );
        Ok(decoded
            .iter()
            .enumerate()
            .map(|(index, (image, delay_ms))| {
                Frame::new(index, scale_to(image, width, height), *delay_ms)
            })
            .collect())
    } else {
        let image = request.source.decode()?;
        log::debug!(
            "Decoded {}x{} still from {}, scaling to {width}x{height}",
            image.width(),
            image.height(),
            request.source
        );
        Ok(vec![Frame::new(
            0,
            scale_to(&image, width, height),
            DEFAULT_FRAME_DELAY_MS,
        )])
    }
}
