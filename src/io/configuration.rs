//! Render constants and runtime configuration defaults

// Cost is O(width × height × tile area), so the scaled source is capped
/// Maximum number of source pixels a render may process
pub const MAX_ALLOWED_PIXELS: u64 = 30_000;

/// Center of the per-cell brightness variation gray
pub const VARY_CENTER: f32 = 128.0;
/// Maximum distance of the variation gray from its center
pub const VARY_SPREAD: f32 = 25.0;

/// Largest palette an animated frame may use
pub const MAX_PALETTE_COLORS: usize = 256;
// Below this alpha a quantized pixel maps to the transparent palette slot
/// Alpha threshold for transparency in palette output
pub const TRANSPARENCY_THRESHOLD: u8 = 128;

/// JPEG quality for still output (0-100)
pub const JPEG_QUALITY: u8 = 80;

/// Delay used when a decoded frame carries none
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const MIN_FRAME_DELAY_MS: u32 = 20;

/// File stem of every produced artifact
pub const DOWNLOAD_STEM: &str = "download";

/// Background fill used when one is enabled without an explicit color
pub const DEFAULT_BACKGROUND_COLOR: [u8; 3] = [255, 255, 255];

/// Default multiplier applied to tile size on the output canvas
pub const DEFAULT_RENDER_SCALE: f64 = 1.0;

/// Texture used when none is requested
pub const DEFAULT_TEXTURE: &str = "knitted";
