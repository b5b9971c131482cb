//! Concurrent decoding of a texture's tile images

use crate::io::error::Result;
use crate::io::source::ImageRef;
use crate::render::picker::TileSet;
use crate::texture::catalog::TextureConfig;
use rayon::prelude::*;

/// Decoded tiles of one texture configuration
#[derive(Debug, Clone)]
pub struct TextureAssets {
    /// Foreground stitch tiles
    pub tiles: TileSet,
    /// Background tiles, when the texture has any
    pub backgrounds: Option<TileSet>,
}

impl TextureAssets {
    /// Decode every tile and background image of `config`
    ///
    /// All images decode in parallel; the first failure aborts the load.
    ///
    /// # Errors
    ///
    /// Returns an error if any image fails to decode or a tile list is empty
    pub fn load(config: &TextureConfig) -> Result<Self> {
        let (tiles, backgrounds) = rayon::join(
            || decode_set(&config.tiles),
            || config.backgrounds.as_deref().map(decode_set).transpose(),
        );

        let assets = Self {
            tiles: tiles?,
            backgrounds: backgrounds?,
        };
        log::debug!(
            "Loaded {} tiles and {} background tiles for {}",
            assets.tiles.len(),
            assets.backgrounds.as_ref().map_or(0, TileSet::len),
            config.label
        );
        Ok(assets)
    }

    /// Wrap already decoded tiles
    pub const fn from_tiles(tiles: TileSet, backgrounds: Option<TileSet>) -> Self {
        Self { tiles, backgrounds }
    }
}

fn decode_set(refs: &[ImageRef]) -> Result<TileSet> {
    let tiles = refs
        .par_iter()
        .map(ImageRef::decode)
        .collect::<Result<Vec<_>>>()?;
    TileSet::new(tiles)
}
