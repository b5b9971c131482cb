/// Decoded tile sets of a texture
pub mod assets;
/// Built-in texture registry
pub mod catalog;
