//! Built-in stitch textures and their layout parameters

use crate::io::error::{Result, SweaterError};
use crate::io::source::ImageRef;
use crate::render::blend::CompositeOp;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Kind of stitch a texture imitates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Knitted V stitches
    Knitted,
    /// Cross stitches on aida cloth
    CrossStitched,
}

impl TextureKind {
    /// Canonical label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Knitted => "knitted",
            Self::CrossStitched => "cross-stitched",
        }
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextureKind {
    type Err = SweaterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "knitted" | "knit" => Ok(Self::Knitted),
            "cross-stitched" | "cross_stitched" | "crossstitched" | "cross-stitch" => {
                Ok(Self::CrossStitched)
            }
            _ => Err(SweaterError::ConfigNotFound {
                kind: s.to_string(),
            }),
        }
    }
}

/// Layout and blending parameters of one texture
#[derive(Debug, Clone)]
pub struct TextureConfig {
    /// Display name
    pub label: &'static str,
    /// Stitch kind this entry is registered under
    pub kind: TextureKind,
    /// Foreground tiles, one picked at random per cell
    pub tiles: Vec<ImageRef>,
    /// Background tiles covering the canvas before stitching
    pub backgrounds: Option<Vec<ImageRef>>,
    /// Horizontal spacing adjustment between tiles, negative to overlap
    pub x_gap: i32,
    /// Vertical spacing adjustment between tiles, negative to overlap
    pub y_gap: i32,
    /// Leave pure white source pixels unstitched
    pub skip_white: bool,
    /// Operation that recolors a tile toward its source pixel
    pub blend_mode: CompositeOp,
}

/// Registry of texture configurations keyed by kind
#[derive(Debug, Clone)]
pub struct TextureCatalog {
    entries: Vec<TextureConfig>,
}

macro_rules! embedded {
    ($name:literal) => {
        ImageRef::Embedded {
            name: $name,
            bytes: include_bytes!(concat!("../../assets/", $name)),
        }
    };
}

static BUILTIN: LazyLock<TextureCatalog> = LazyLock::new(|| {
    TextureCatalog::new(vec![
        TextureConfig {
            label: "Knitted",
            kind: TextureKind::Knitted,
            tiles: vec![
                embedded!("knitted/stitch_1.png"),
                embedded!("knitted/stitch_2.png"),
                embedded!("knitted/stitch_3.png"),
            ],
            backgrounds: None,
            x_gap: -1,
            y_gap: -6,
            skip_white: false,
            blend_mode: CompositeOp::Multiply,
        },
        TextureConfig {
            label: "Cross-stitched",
            kind: TextureKind::CrossStitched,
            tiles: vec![
                embedded!("cross_stitched/stitch_1.png"),
                embedded!("cross_stitched/stitch_2.png"),
            ],
            backgrounds: Some(vec![
                embedded!("cross_stitched/aida_1.png"),
                embedded!("cross_stitched/aida_2.png"),
            ]),
            x_gap: 0,
            y_gap: 0,
            skip_white: true,
            blend_mode: CompositeOp::Overlay,
        },
    ])
});

impl TextureCatalog {
    /// Build a catalog from explicit entries
    ///
    /// Later entries never shadow earlier ones of the same kind.
    pub const fn new(entries: Vec<TextureConfig>) -> Self {
        Self { entries }
    }

    /// The catalog compiled into the crate
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Find the configuration for a texture kind
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if no entry is registered for `kind`
    pub fn lookup(&self, kind: TextureKind) -> Result<&TextureConfig> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .ok_or_else(|| SweaterError::ConfigNotFound {
                kind: kind.to_string(),
            })
    }

    /// Find the configuration for a texture label such as `"cross-stitched"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the label names no known kind or the kind
    /// has no entry
    pub fn lookup_label(&self, label: &str) -> Result<&TextureConfig> {
        self.lookup(label.parse()?)
    }

    /// Kinds with a registered entry, in registration order
    pub fn kinds(&self) -> impl Iterator<Item = TextureKind> + '_ {
        self.entries.iter().map(|entry| entry.kind)
    }
}
