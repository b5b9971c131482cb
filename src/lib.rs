//! Re-render pixel art as knitted or cross-stitched textures
//!
//! Every source pixel becomes one stitch tile, picked at random from the
//! texture's tile set and recolored toward the pixel's color with a small
//! random brightness variation. Still sources produce a single raster;
//! animated GIF sources are re-encoded frame by frame.

#![forbid(unsafe_code)]

/// Source decoding, encoding, configuration, CLI and error handling
pub mod io;
/// Compositing, grid layout and frame assembly
pub mod render;
/// Built-in stitch textures and their tile assets
pub mod texture;

pub use io::error::{Result, SweaterError};
