/// Command-line interface and render orchestration
pub mod cli;
/// Limits and defaults shared across the crate
pub mod configuration;
/// Still and animated output encoding
pub mod encoder;
/// Error types and result alias
pub mod error;
/// Terminal progress display
pub mod progress;
/// Palette quantization for indexed frames
pub mod quantize;
/// Image references, frame decoding and source scaling
pub mod source;
