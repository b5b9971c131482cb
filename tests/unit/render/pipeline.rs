//! Tests for the end-to-end render entry points

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::PathBuf;
    use uglysweater::SweaterError;
    use uglysweater::io::source::ImageRef;
    use uglysweater::render::animation::RenderOutput;
    use uglysweater::render::observer::NoopObserver;
    use uglysweater::render::pipeline::render;
    use uglysweater::render::request::RenderRequest;
    use uglysweater::texture::catalog::{TextureCatalog, TextureKind};

    fn source_png() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        RgbaImage::from_fn(4, 4, |x, y| Rgba([(x * 60) as u8, (y * 60) as u8, 90, 255]))
            .save(&path)
            .unwrap();
        (dir, path)
    }

    // Tests a still render with the built-in knitted texture
    // Verified by ignoring the requested target size
    #[test]
    fn test_render_builtin_knitted() {
        let (_dir, path) = source_png();
        let request = RenderRequest::new(ImageRef::Path(path), TextureKind::Knitted, 2, 2);

        let output = render(
            &request,
            TextureCatalog::builtin(),
            &mut StdRng::seed_from_u64(1),
            &mut NoopObserver,
        )
        .unwrap();

        match output {
            RenderOutput::Still(image) => assert_eq!(image.dimensions(), (23, 22)),
            RenderOutput::Animated(_) => panic!("expected a still"),
        }
    }

    // Tests missing catalog entries fail before decoding
    // Verified by falling back to the first catalog entry
    #[test]
    fn test_unknown_texture() {
        let (_dir, path) = source_png();
        let request = RenderRequest::new(ImageRef::Path(path), TextureKind::CrossStitched, 2, 2);
        let empty = TextureCatalog::new(Vec::new());

        let result = render(
            &request,
            &empty,
            &mut StdRng::seed_from_u64(1),
            &mut NoopObserver,
        );

        assert!(matches!(result, Err(SweaterError::ConfigNotFound { .. })));
    }

    // Tests oversized requests fail without opening the source
    // Verified by decoding the source first
    #[test]
    fn test_budget_checked_first() {
        let request = RenderRequest::new(
            ImageRef::Path(PathBuf::from("/nonexistent/sprite.png")),
            TextureKind::Knitted,
            200,
            151,
        );

        let result = render(
            &request,
            TextureCatalog::builtin(),
            &mut StdRng::seed_from_u64(1),
            &mut NoopObserver,
        );

        assert!(matches!(
            result,
            Err(SweaterError::PixelBudgetExceeded { .. })
        ));
    }

    // Tests a missing source surfaces as a decode error
    // Verified by swallowing decode errors from the parallel join
    #[test]
    fn test_missing_source() {
        let request = RenderRequest::new(
            ImageRef::Path(PathBuf::from("/nonexistent/sprite.png")),
            TextureKind::Knitted,
            2,
            2,
        );

        let result = render(
            &request,
            TextureCatalog::builtin(),
            &mut StdRng::seed_from_u64(1),
            &mut NoopObserver,
        );

        assert!(matches!(result, Err(SweaterError::Decode { .. })));
    }
}
