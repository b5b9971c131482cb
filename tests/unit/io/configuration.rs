//! Tests for render limits and defaults

#[cfg(test)]
mod tests {
    use uglysweater::io::configuration::{
        DEFAULT_BACKGROUND_COLOR, DEFAULT_FRAME_DELAY_MS, DEFAULT_RENDER_SCALE, DEFAULT_TEXTURE,
        DOWNLOAD_STEM, JPEG_QUALITY, MAX_ALLOWED_PIXELS, MAX_PALETTE_COLORS, MIN_FRAME_DELAY_MS,
        VARY_CENTER, VARY_SPREAD,
    };
    use uglysweater::texture::catalog::TextureKind;

    // Tests pixel budget value
    // Verified by raising the limit
    #[test]
    fn test_max_allowed_pixels() {
        assert_eq!(MAX_ALLOWED_PIXELS, 30_000);
    }

    // Tests variation gray stays inside the byte range
    // Verified by widening spread past 128
    #[test]
    fn test_vary_range_fits_in_byte() {
        assert!(VARY_CENTER - VARY_SPREAD >= 0.0);
        assert!(VARY_CENTER + VARY_SPREAD <= 255.0);
        assert!((VARY_CENTER - 128.0).abs() < f32::EPSILON);
        assert!((VARY_SPREAD - 25.0).abs() < f32::EPSILON);
    }

    // Tests encoder limits
    // Verified by changing quality and palette size
    #[test]
    fn test_encoder_limits() {
        assert_eq!(JPEG_QUALITY, 80);
        assert_eq!(MAX_PALETTE_COLORS, 256);
        assert!(MIN_FRAME_DELAY_MS <= DEFAULT_FRAME_DELAY_MS);
    }

    // Tests defaults used by the CLI
    // Verified by renaming the default texture
    #[test]
    fn test_defaults() {
        assert_eq!(DOWNLOAD_STEM, "download");
        assert_eq!(DEFAULT_BACKGROUND_COLOR, [255, 255, 255]);
        assert!((DEFAULT_RENDER_SCALE - 1.0).abs() < f64::EPSILON);
        assert!(DEFAULT_TEXTURE.parse::<TextureKind>().is_ok());
    }
}
