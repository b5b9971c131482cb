//! Command-line interface for rendering one image or GIF as a stitched texture

use crate::io::configuration::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_RENDER_SCALE, DEFAULT_TEXTURE, MAX_ALLOWED_PIXELS,
};
use crate::io::encoder::{Artifact, StillFormat};
use crate::io::error::{Result, SweaterError, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::io::source::{ImageRef, resolve_target_size};
use crate::render::observer::NoopObserver;
use crate::render::pipeline::render;
use crate::render::request::RenderRequest;
use crate::texture::catalog::{TextureCatalog, TextureKind};
use clap::Parser;
use image::Rgb;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "uglysweater")]
#[command(
    author,
    version,
    about = "Re-render pixel art as a knitted or cross-stitched texture"
)]
/// Command-line arguments for the renderer
// Independent on/off switches, one per user-facing option
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Source image; GIFs are rendered frame by frame
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Stitch texture: knitted or cross-stitched
    #[arg(short, long, default_value = DEFAULT_TEXTURE)]
    pub texture: TextureKind,

    /// Width in stitches (keeps the aspect ratio if height is omitted)
    #[arg(short = 'w', long)]
    pub width: Option<u32>,

    /// Height in stitches (keeps the aspect ratio if width is omitted)
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Multiplier applied to tile size on the output
    #[arg(short = 'S', long, default_value_t = DEFAULT_RENDER_SCALE)]
    pub scale: f64,

    /// Fill the canvas with this color first, as #rgb or #rrggbb
    #[arg(short, long, value_parser = parse_hex_color)]
    pub background: Option<Rgb<u8>>,

    /// Output format for still renders
    #[arg(short, long, value_enum, default_value_t = StillFormat::Png)]
    pub format: StillFormat,

    /// Render only the first frame of an animated source
    #[arg(long)]
    pub still: bool,

    /// Random seed for a reproducible render
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Directory the artifact is written to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Largest accepted width × height in stitches
    #[arg(long, default_value_t = MAX_ALLOWED_PIXELS)]
    pub max_pixels: u64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Color JPEG output is flattened onto
    pub fn matte(&self) -> Rgb<u8> {
        self.background.unwrap_or(Rgb(DEFAULT_BACKGROUND_COLOR))
    }
}

/// Parse `#rgb` or `#rrggbb`, with or without the leading `#`
///
/// # Errors
///
/// Returns an invalid parameter error for any other shape or non-hex digits
pub fn parse_hex_color(value: &str) -> Result<Rgb<u8>> {
    let digits = value.trim().trim_start_matches('#');
    let invalid = || invalid_parameter("background", &value, &"expected #rgb or #rrggbb");

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    match digits.len() {
        3 => {
            let mut channels = digits
                .chars()
                .filter_map(|c| c.to_digit(16))
                .map(|d| (d * 17) as u8);
            match (channels.next(), channels.next(), channels.next()) {
                (Some(r), Some(g), Some(b)) => Ok(Rgb([r, g, b])),
                _ => Err(invalid()),
            }
        }
        6 => {
            let pair = |range: std::ops::Range<usize>| {
                digits
                    .get(range)
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .ok_or_else(invalid)
            };
            Ok(Rgb([pair(0..2)?, pair(2..4)?, pair(4..6)?]))
        }
        _ => Err(invalid()),
    }
}

/// Write an artifact into `directory`, creating it if needed
///
/// # Errors
///
/// Returns a file system error if the directory or file cannot be written
pub fn write_artifact(directory: &Path, artifact: &Artifact) -> Result<PathBuf> {
    fs::create_dir_all(directory).map_err(|source| SweaterError::FileSystem {
        path: directory.to_path_buf(),
        operation: "create output directory",
        source,
    })?;

    let path = directory.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes).map_err(|source| SweaterError::FileSystem {
        path: path.clone(),
        operation: "write artifact",
        source,
    })?;
    Ok(path)
}

/// Resolves the CLI arguments into a render and writes its artifact
pub struct RenderCommand {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl RenderCommand {
    /// Create a command for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Build the render request, reading the source header for missing dimensions
    ///
    /// # Errors
    ///
    /// Returns a decode error if the source header cannot be read
    pub fn build_request(&self) -> Result<RenderRequest> {
        let source = ImageRef::Path(self.cli.input.clone());
        let (width, height) =
            resolve_target_size(source.dimensions()?, self.cli.width, self.cli.height);
        let animated = source.is_gif() && !self.cli.still;

        let request = RenderRequest::new(source, self.cli.texture, width, height)
            .with_animation(animated)
            .with_scale(self.cli.scale)
            .with_max_pixels(self.cli.max_pixels);

        Ok(match self.cli.background {
            Some(color) => request.with_background(color),
            None => request,
        })
    }

    /// Render and write the artifact
    ///
    /// Returns the written path, or `None` when the source exceeded the pixel
    /// budget and the user was told so.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding, rendering, encoding or writing fails
    // Allow print for user feedback on rejected sources and written files
    #[allow(clippy::print_stderr)]
    pub fn execute(&mut self) -> Result<Option<PathBuf>> {
        let request = self.build_request()?;
        let mut rng = self
            .cli
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let catalog = TextureCatalog::builtin();

        let result = match self.progress_manager.as_mut() {
            Some(pm) => render(&request, catalog, &mut rng, pm),
            None => render(&request, catalog, &mut rng, &mut NoopObserver),
        };

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        let output = match result {
            Err(error) if error.is_user_facing() => {
                if !self.cli.quiet {
                    eprintln!("{error}");
                }
                return Ok(None);
            }
            other => other?,
        };

        let artifact = output.into_artifact(self.cli.format, self.cli.matte())?;
        let path = write_artifact(&self.cli.output, &artifact)?;

        if !self.cli.quiet {
            eprintln!("Wrote {}", path.display());
        }
        Ok(Some(path))
    }
}
