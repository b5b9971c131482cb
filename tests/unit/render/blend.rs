//! Tests for blend modes and compositing operators

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use uglysweater::render::blend::{CompositeOp, blit, draw, fill, flood};

    const OPAQUE_RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    // Tests channel formulas at reference points
    // Verified by swapping overlay and soft light branches
    #[test]
    fn test_blend_channel_reference_values() {
        let close = |a: f32, b: f32| (a - b).abs() < 1e-5;

        assert!(close(CompositeOp::Multiply.blend_channel(0.5, 0.5), 0.25));
        assert!(close(CompositeOp::Screen.blend_channel(0.5, 0.5), 0.75));
        assert!(close(CompositeOp::Overlay.blend_channel(0.25, 1.0), 0.5));
        assert!(close(CompositeOp::Overlay.blend_channel(0.75, 0.0), 0.5));
        assert!(close(CompositeOp::SoftLight.blend_channel(0.3, 0.5), 0.3));
        assert!(close(CompositeOp::SourceOver.blend_channel(0.1, 0.9), 0.9));
    }

    // Tests source-over of opaque and transparent pixels
    // Verified by ignoring source alpha
    #[test]
    fn test_source_over() {
        let backdrop = Rgba([0, 0, 255, 255]);
        assert_eq!(CompositeOp::SourceOver.composite(backdrop, OPAQUE_RED), OPAQUE_RED);
        assert_eq!(CompositeOp::SourceOver.composite(backdrop, CLEAR), backdrop);
        assert_eq!(CompositeOp::SourceOver.composite(CLEAR, CLEAR), CLEAR);

        let half = CompositeOp::SourceOver.composite(CLEAR, Rgba([255, 0, 0, 128]));
        assert_eq!(half, Rgba([255, 0, 0, 128]));
    }

    // Tests blend modes only act where both layers exist
    // Verified by blending over transparent backdrops
    #[test]
    fn test_blend_over_transparent_backdrop() {
        let result = CompositeOp::Multiply.composite(CLEAR, Rgba([40, 80, 120, 255]));
        assert_eq!(result, Rgba([40, 80, 120, 255]));

        let darker = CompositeOp::Multiply.composite(Rgba([128, 128, 128, 255]), OPAQUE_RED);
        assert_eq!(darker, Rgba([128, 0, 0, 255]));
    }

    // Tests destination-in keeps backdrop color and multiplies alpha
    // Verified by taking color from the source
    #[test]
    fn test_destination_in() {
        let backdrop = Rgba([10, 20, 30, 255]);
        assert_eq!(
            CompositeOp::DestinationIn.composite(backdrop, Rgba([200, 200, 200, 255])),
            backdrop
        );
        assert_eq!(CompositeOp::DestinationIn.composite(backdrop, CLEAR), CLEAR);

        let halved = CompositeOp::DestinationIn.composite(backdrop, Rgba([0, 0, 0, 128]));
        assert_eq!(halved[3], 128);
        assert_eq!(&halved.0[..3], &[10, 20, 30]);
    }

    // Tests fill covers every pixel and keeps dimensions
    // Verified by skipping the last row
    #[test]
    fn test_fill() {
        let buffer = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        let filled = fill(buffer, Rgba([100, 50, 0, 255]), CompositeOp::Multiply);

        assert_eq!(filled.dimensions(), (3, 2));
        assert!(filled.pixels().all(|p| *p == Rgba([100, 50, 0, 255])));
    }

    // Tests draw treats pixels outside the source as transparent
    // Verified by leaving outside pixels untouched under destination-in
    #[test]
    fn test_draw_outside_source() {
        let buffer = RgbaImage::from_pixel(3, 3, OPAQUE_RED);
        let mask = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));

        let cut = draw(buffer.clone(), &mask, CompositeOp::DestinationIn);
        assert_eq!(*cut.get_pixel(1, 1), OPAQUE_RED);
        assert_eq!(*cut.get_pixel(2, 2), CLEAR);

        let over = draw(buffer, &mask, CompositeOp::SourceOver);
        assert_eq!(*over.get_pixel(2, 2), OPAQUE_RED);
        assert_eq!(*over.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    // Tests blit clips at every edge including negative offsets
    // Verified by wrapping negative coordinates
    #[test]
    fn test_blit_clipping() {
        let mut canvas = RgbaImage::new(4, 4);
        let tile = RgbaImage::from_pixel(3, 3, OPAQUE_RED);

        blit(&mut canvas, &tile, -2, -2);
        assert_eq!(*canvas.get_pixel(0, 0), OPAQUE_RED);
        assert_eq!(*canvas.get_pixel(1, 1), CLEAR);

        blit(&mut canvas, &tile, 3, 3);
        assert_eq!(*canvas.get_pixel(3, 3), OPAQUE_RED);
        assert_eq!(*canvas.get_pixel(2, 3), CLEAR);

        blit(&mut canvas, &tile, 10, 10);
        assert_eq!(canvas.pixels().filter(|p| p[3] > 0).count(), 2);
    }

    // Tests flood replaces every pixel
    // Verified by compositing instead of replacing
    #[test]
    fn test_flood() {
        let mut canvas = RgbaImage::from_pixel(2, 2, OPAQUE_RED);
        flood(&mut canvas, CLEAR);
        assert!(canvas.pixels().all(|p| *p == CLEAR));
    }
}
