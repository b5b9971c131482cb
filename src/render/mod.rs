/// Frame sequencing and output assembly
pub mod animation;
/// Pixel compositing operations
pub mod blend;
/// Canvas layout and per-frame stitching
pub mod grid;
/// Render progress notifications
pub mod observer;
/// Tile recoloring
pub mod patch;
/// Tile sets and random tile choice
pub mod picker;
/// End-to-end render entry points
pub mod pipeline;
/// Render parameters
pub mod request;
