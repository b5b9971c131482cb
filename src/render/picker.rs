//! Uniform random tile selection

use crate::io::error::{Result, invalid_parameter};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use num_traits::ToPrimitive;
use rand::Rng;

/// Non-empty set of decoded tiles
///
/// Every grid cell draws its own tile, so neighbouring stitches vary the way
/// hand knitting does. Nothing is cached between picks.
#[derive(Debug, Clone)]
pub struct TileSet {
    first: RgbaImage,
    rest: Vec<RgbaImage>,
}

impl TileSet {
    /// Create a tile set
    ///
    /// # Errors
    ///
    /// Returns an error if `tiles` is empty or any tile has a zero dimension
    pub fn new(tiles: Vec<RgbaImage>) -> Result<Self> {
        let mut iter = tiles.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| invalid_parameter("tiles", &"[]", &"at least one tile is required"))?;
        let rest: Vec<RgbaImage> = iter.collect();

        for tile in std::iter::once(&first).chain(&rest) {
            if tile.width() == 0 || tile.height() == 0 {
                return Err(invalid_parameter(
                    "tiles",
                    &format!("{}x{}", tile.width(), tile.height()),
                    &"tiles must not be empty",
                ));
            }
        }

        Ok(Self { first, rest })
    }

    /// The first tile, which defines the grid stride
    pub const fn first(&self) -> &RgbaImage {
        &self.first
    }

    /// Number of tiles in the set
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always false; a tile set holds at least one tile
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the tiles in order
    pub fn iter(&self) -> impl Iterator<Item = &RgbaImage> {
        std::iter::once(&self.first).chain(&self.rest)
    }

    /// Pick one tile uniformly at random
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &RgbaImage {
        let index = rng.random_range(0..self.len());
        index
            .checked_sub(1)
            .and_then(|i| self.rest.get(i))
            .unwrap_or(&self.first)
    }

    /// Resize every tile by `scale`
    ///
    /// Each tile becomes `round(width * scale) × round(height * scale)`. A
    /// scale of exactly one returns an unchanged copy.
    ///
    /// # Errors
    ///
    /// Returns an error if a scaled tile would have a zero or unrepresentable dimension
    pub fn scaled(&self, scale: f64) -> Result<Self> {
        if (scale - 1.0).abs() < f64::EPSILON {
            return Ok(self.clone());
        }

        let tiles = self
            .iter()
            .map(|tile| {
                let width = scaled_length(tile.width(), scale)?;
                let height = scaled_length(tile.height(), scale)?;
                Ok(imageops::resize(tile, width, height, FilterType::CatmullRom))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(tiles)
    }
}

/// Length of `length` pixels after scaling, rounded to whole pixels
///
/// # Errors
///
/// Returns an error if the result is zero or does not fit in `u32`
pub fn scaled_length(length: u32, scale: f64) -> Result<u32> {
    (f64::from(length) * scale)
        .round()
        .to_u32()
        .filter(|&scaled| scaled > 0)
        .ok_or_else(|| {
            invalid_parameter(
                "render_scale",
                &scale,
                &format!("scaling a {length} pixel tile must leave at least one pixel"),
            )
        })
}
