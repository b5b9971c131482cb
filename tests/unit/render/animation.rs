//! Tests for frame sequencing and output assembly

#[cfg(test)]
mod tests {
    use image::{Rgb, Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uglysweater::SweaterError;
    use uglysweater::io::encoder::{
        AnimationEncoder, GifAnimationEncoder, PaletteFrame, StillFormat,
    };
    use uglysweater::io::error::{Result, encode_error};
    use uglysweater::io::source::Frame;
    use uglysweater::render::animation::{RenderOutput, assemble};
    use uglysweater::render::blend::CompositeOp;
    use uglysweater::render::grid::GridRenderer;
    use uglysweater::render::observer::RenderObserver;
    use uglysweater::render::picker::TileSet;
    use uglysweater::texture::assets::TextureAssets;
    use uglysweater::texture::catalog::{TextureConfig, TextureKind};

    #[derive(Debug, Default)]
    struct RecordingEncoder {
        delays: Vec<u32>,
        fail_at: Option<usize>,
    }

    impl AnimationEncoder for RecordingEncoder {
        fn write_frame(&mut self, frame: &PaletteFrame) -> Result<()> {
            if self.fail_at == Some(self.delays.len()) {
                return Err(encode_error("GIF", &"disk full"));
            }
            self.delays.push(frame.delay_ms);
            Ok(())
        }

        fn finish(self) -> Result<Vec<u8>> {
            Ok(self
                .delays
                .iter()
                .map(|delay| u8::try_from(*delay / 10).unwrap_or(u8::MAX))
                .collect())
        }
    }

    #[derive(Default)]
    struct CompletionCounter {
        frames: usize,
        completed: usize,
    }

    impl RenderObserver for CompletionCounter {
        fn frame_completed(&mut self, _index: usize, _total: usize) {
            self.frames += 1;
        }

        fn render_completed(&mut self) {
            self.completed += 1;
        }
    }

    fn config() -> TextureConfig {
        TextureConfig {
            label: "Test",
            kind: TextureKind::Knitted,
            tiles: Vec::new(),
            backgrounds: None,
            x_gap: -1,
            y_gap: -2,
            skip_white: false,
            blend_mode: CompositeOp::Multiply,
        }
    }

    fn assets() -> TextureAssets {
        let tile = RgbaImage::from_fn(6, 6, |x, _| {
            Rgba([230, 230, 230, if x == 0 { 0 } else { 255 }])
        });
        TextureAssets::from_tiles(TileSet::new(vec![tile]).unwrap(), None)
    }

    fn frames(delays: &[u32]) -> Vec<Frame> {
        delays
            .iter()
            .enumerate()
            .map(|(index, &delay)| {
                let shade = (index * 40) as u8;
                let image = RgbaImage::from_pixel(3, 2, Rgba([shade, 90, 160, 255]));
                Frame::new(index, image, delay)
            })
            .collect()
    }

    // Tests every frame reaches the encoder in order
    // Verified by reversing the frame loop
    #[test]
    fn test_frames_encoded_in_order() {
        let cfg = config();
        let assets = assets();
        let mut renderer = GridRenderer::new(&cfg, &assets, 1.0, None).unwrap();
        let mut observer = CompletionCounter::default();
        let mut rng = StdRng::seed_from_u64(4);

        let output = assemble(
            &mut renderer,
            &frames(&[30, 60, 90, 120]),
            &mut rng,
            &mut observer,
            |_, _| Ok(RecordingEncoder::default()),
        )
        .unwrap();

        let RenderOutput::Animated(animation) = output else {
            panic!("expected an animation");
        };
        assert_eq!(animation.frame_count, 4);
        assert_eq!(animation.bytes, vec![3, 6, 9, 12]);
        assert_eq!((animation.width, animation.height), (16, 10));
        assert_eq!(observer.frames, 4);
        assert_eq!(observer.completed, 1);
    }

    // Tests the encoder is created for the canvas size
    // Verified by passing the source frame size to the factory
    #[test]
    fn test_encoder_created_with_canvas_size() {
        let cfg = config();
        let assets = assets();
        let mut renderer = GridRenderer::new(&cfg, &assets, 1.0, None).unwrap();
        let mut requested = None;

        assemble(
            &mut renderer,
            &frames(&[10, 10]),
            &mut StdRng::seed_from_u64(0),
            &mut CompletionCounter::default(),
            |width, height| {
                requested = Some((width, height));
                Ok(RecordingEncoder::default())
            },
        )
        .unwrap();

        assert_eq!(requested, Some((16, 10)));
    }

    // Tests a single frame yields a raster without touching the encoder
    // Verified by always encoding
    #[test]
    fn test_single_frame_is_still() {
        let cfg = config();
        let assets = assets();
        let mut renderer = GridRenderer::new(&cfg, &assets, 1.0, None).unwrap();
        let mut observer = CompletionCounter::default();

        let output = assemble(
            &mut renderer,
            &frames(&[100]),
            &mut StdRng::seed_from_u64(0),
            &mut observer,
            |_, _| -> Result<RecordingEncoder> { panic!("encoder must not be created") },
        )
        .unwrap();

        match output {
            RenderOutput::Still(image) => assert_eq!(image.dimensions(), (16, 10)),
            RenderOutput::Animated(_) => panic!("expected a still"),
        }
        assert_eq!(observer.completed, 1);
    }

    // Tests an encoder failure aborts without completion
    // Verified by skipping frames the encoder rejects
    #[test]
    fn test_encoder_failure_aborts() {
        let cfg = config();
        let assets = assets();
        let mut renderer = GridRenderer::new(&cfg, &assets, 1.0, None).unwrap();
        let mut observer = CompletionCounter::default();

        let result = assemble(
            &mut renderer,
            &frames(&[10, 20, 30]),
            &mut StdRng::seed_from_u64(0),
            &mut observer,
            |_, _| {
                Ok(RecordingEncoder {
                    fail_at: Some(1),
                    ..RecordingEncoder::default()
                })
            },
        );

        assert!(matches!(result, Err(SweaterError::Encode { .. })));
        assert_eq!(observer.completed, 0);
        assert_eq!(observer.frames, 2);
    }

    // Tests an empty frame list is rejected
    // Verified by returning an empty still
    #[test]
    fn test_no_frames() {
        let cfg = config();
        let assets = assets();
        let mut renderer = GridRenderer::new(&cfg, &assets, 1.0, None).unwrap();

        let result = assemble(
            &mut renderer,
            &[],
            &mut StdRng::seed_from_u64(0),
            &mut CompletionCounter::default(),
            |_, _| Ok(RecordingEncoder::default()),
        );

        assert!(result.is_err());
    }

    // Tests the GIF encoder output becomes the download artifact
    // Verified by naming animations after the still format
    #[test]
    fn test_animated_artifact() {
        let cfg = config();
        let assets = assets();
        let mut renderer = GridRenderer::new(&cfg, &assets, 1.0, None).unwrap();

        let output = assemble(
            &mut renderer,
            &frames(&[50, 50, 50]),
            &mut StdRng::seed_from_u64(8),
            &mut CompletionCounter::default(),
            GifAnimationEncoder::new,
        )
        .unwrap();

        let artifact = output
            .into_artifact(StillFormat::Jpeg, Rgb([255, 255, 255]))
            .unwrap();
        assert_eq!(artifact.file_name, "download.gif");
        assert_eq!(
            image::guess_format(&artifact.bytes).unwrap(),
            image::ImageFormat::Gif
        );
    }
}
