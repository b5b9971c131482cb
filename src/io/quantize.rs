//! Median-cut palette quantization for indexed animation frames

use crate::io::configuration::{MAX_PALETTE_COLORS, TRANSPARENCY_THRESHOLD};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;

/// Indexed color table of at most 256 entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
    transparent: Option<u8>,
}

impl Palette {
    /// Build a palette from explicit entries
    ///
    /// Entries beyond 256 are dropped; a transparent index past the end is ignored.
    pub fn new(mut colors: Vec<[u8; 3]>, transparent: Option<u8>) -> Self {
        colors.truncate(MAX_PALETTE_COLORS);
        let transparent = transparent.filter(|&index| usize::from(index) < colors.len());
        Self {
            colors,
            transparent,
        }
    }

    /// Palette entries in index order
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Index reserved for transparent pixels, if the frame has any
    pub const fn transparent_index(&self) -> Option<u8> {
        self.transparent
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no entries
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entries flattened to `r, g, b` triples
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flatten().copied().collect()
    }

    /// Index of the entry closest to `color` in RGB space
    pub fn nearest(&self, color: [u8; 3]) -> u8 {
        let mut best = 0usize;
        let mut best_distance = u32::MAX;
        for (index, entry) in self.colors.iter().enumerate() {
            if Some(index) == self.transparent.map(usize::from) {
                continue;
            }
            let distance = squared_distance(*entry, color);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        u8::try_from(best).unwrap_or(u8::MAX)
    }
}

fn squared_distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| u32::from(x.abs_diff(y)).pow(2))
        .sum()
}

const fn is_transparent(pixel: Rgba<u8>) -> bool {
    pixel.0[3] < TRANSPARENCY_THRESHOLD
}

const fn rgb(pixel: Rgba<u8>) -> [u8; 3] {
    [pixel.0[0], pixel.0[1], pixel.0[2]]
}

#[derive(Debug, Clone, Copy)]
enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    const fn of(self, color: [u8; 3]) -> u8 {
        match self {
            Self::Red => color[0],
            Self::Green => color[1],
            Self::Blue => color[2],
        }
    }
}

/// Colors of one median-cut box with their pixel counts
#[derive(Debug, Clone)]
struct ColorBox {
    colors: Vec<([u8; 3], u32)>,
}

impl ColorBox {
    fn pixel_count(&self) -> u64 {
        self.colors.iter().map(|(_, count)| u64::from(*count)).sum()
    }

    fn widest_channel(&self) -> (Channel, u8) {
        let range = |channel: Channel| {
            let values = self.colors.iter().map(|(color, _)| channel.of(*color));
            let min = values.clone().min().unwrap_or(0);
            let max = values.max().unwrap_or(0);
            max - min
        };

        [Channel::Red, Channel::Green, Channel::Blue]
            .into_iter()
            .map(|channel| (channel, range(channel)))
            .fold((Channel::Red, 0), |best, candidate| {
                if candidate.1 > best.1 { candidate } else { best }
            })
    }

    // Split at the pixel-weighted median of the widest channel
    fn split(mut self) -> (Self, Self) {
        let (channel, _) = self.widest_channel();
        self.colors.sort_by_key(|(color, _)| channel.of(*color));

        let half = self.pixel_count() / 2;
        let mut running = 0u64;
        let mut split_at = self.colors.len() / 2;
        for (index, (_, count)) in self.colors.iter().enumerate() {
            running += u64::from(*count);
            if running >= half {
                split_at = index + 1;
                break;
            }
        }
        split_at = split_at.clamp(1, self.colors.len().saturating_sub(1).max(1));

        let right = self.colors.split_off(split_at);
        (self, Self { colors: right })
    }

    fn average(&self) -> [u8; 3] {
        let total = self.pixel_count().max(1);
        let mut sums = [0u64; 3];
        for (color, count) in &self.colors {
            for (sum, channel) in sums.iter_mut().zip(color.iter()) {
                *sum += u64::from(*channel) * u64::from(*count);
            }
        }
        sums.map(|sum| u8::try_from(sum / total).unwrap_or(u8::MAX))
    }
}

/// Reduce a raster to a palette of at most `max_colors` entries
///
/// Pixels with alpha below the transparency threshold share one reserved
/// transparent entry at the end of the palette. Frames with few enough
/// distinct colors keep them exactly; others are reduced by median cut.
/// `max_colors` is clamped to `1..=256`; with a limit of one, a frame mixing
/// opaque and transparent pixels still gets both entries.
pub fn quantize(image: &RgbaImage, max_colors: usize) -> Palette {
    let max_colors = max_colors.clamp(1, MAX_PALETTE_COLORS);

    let mut counts: HashMap<[u8; 3], u32> = HashMap::new();
    let mut has_transparent = false;
    for pixel in image.pixels() {
        if is_transparent(*pixel) {
            has_transparent = true;
        } else {
            *counts.entry(rgb(*pixel)).or_insert(0) += 1;
        }
    }

    let budget = if has_transparent {
        max_colors.saturating_sub(1).max(1)
    } else {
        max_colors
    };

    let mut unique: Vec<([u8; 3], u32)> = counts.into_iter().collect();
    unique.sort_unstable();

    let mut colors: Vec<[u8; 3]> = if unique.len() <= budget {
        unique.into_iter().map(|(color, _)| color).collect()
    } else {
        median_cut(unique, budget)
    };

    let transparent = if has_transparent || colors.is_empty() {
        let index = u8::try_from(colors.len()).unwrap_or(u8::MAX);
        colors.push([0, 0, 0]);
        Some(index)
    } else {
        None
    };

    Palette {
        colors,
        transparent,
    }
}

fn median_cut(colors: Vec<([u8; 3], u32)>, budget: usize) -> Vec<[u8; 3]> {
    let mut boxes = vec![ColorBox { colors }];

    while boxes.len() < budget {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, color_box)| color_box.colors.len() > 1)
            .max_by_key(|(_, color_box)| color_box.pixel_count())
            .map(|(index, _)| index);

        let Some(index) = candidate else {
            break;
        };
        let color_box = boxes.swap_remove(index);
        let (left, right) = color_box.split();
        boxes.push(left);
        boxes.push(right);
    }

    boxes.iter().map(ColorBox::average).collect()
}

/// Map every pixel to its palette index, row-major
///
/// Transparent pixels map to the palette's transparent entry.
pub fn apply_palette(image: &RgbaImage, palette: &Palette) -> Vec<u8> {
    let mut cache: HashMap<[u8; 3], u8> = HashMap::new();
    image
        .pixels()
        .map(|pixel| match palette.transparent_index() {
            Some(index) if is_transparent(*pixel) => index,
            _ => *cache
                .entry(rgb(*pixel))
                .or_insert_with(|| palette.nearest(rgb(*pixel))),
        })
        .collect()
}
