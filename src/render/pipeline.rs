//! End-to-end render of one request

use crate::io::encoder::{AnimationEncoder, GifAnimationEncoder};
use crate::io::error::Result;
use crate::io::source::load_frames;
use crate::render::animation::{RenderOutput, assemble};
use crate::render::grid::GridRenderer;
use crate::render::observer::RenderObserver;
use crate::render::request::RenderRequest;
use crate::texture::assets::TextureAssets;
use crate::texture::catalog::TextureCatalog;
use rand::Rng;
use std::time::Instant;

/// Render a request into a still raster or an encoded GIF
///
/// See [`render_with_encoder`].
///
/// # Errors
///
/// Returns an error if the request is invalid, the texture is unknown, any
/// asset fails to decode, or encoding fails
pub fn render<R, O>(
    request: &RenderRequest,
    catalog: &TextureCatalog,
    rng: &mut R,
    observer: &mut O,
) -> Result<RenderOutput>
where
    R: Rng + ?Sized,
    O: RenderObserver + ?Sized,
{
    render_with_encoder(request, catalog, rng, observer, GifAnimationEncoder::new)
}

/// Render a request, encoding animations with a caller-supplied encoder
///
/// The request is validated first, so oversized sources fail before anything
/// is decoded. Source frames and texture tiles then decode concurrently and
/// the render waits for all of them; a single decode failure aborts it.
/// Every buffer lives inside this call, so concurrent renders never share
/// state.
///
/// # Errors
///
/// Returns an error if the request is invalid, the texture is unknown, any
/// asset fails to decode, or encoding fails
pub fn render_with_encoder<R, O, E, F>(
    request: &RenderRequest,
    catalog: &TextureCatalog,
    rng: &mut R,
    observer: &mut O,
    make_encoder: F,
) -> Result<RenderOutput>
where
    R: Rng + ?Sized,
    O: RenderObserver + ?Sized,
    E: AnimationEncoder,
    F: FnOnce(u32, u32) -> Result<E>,
{
    let start = Instant::now();
    request.validate()?;
    let config = catalog.lookup(request.texture)?;

    log::info!(
        "Rendering {} as {} at {}x{} (scale {})",
        request.source,
        config.label,
        request.target_width,
        request.target_height,
        request.render_scale
    );

    let (frames, assets) = rayon::join(|| load_frames(request), || TextureAssets::load(config));
    let frames = frames?;
    let assets = assets?;

    let mut renderer =
        GridRenderer::new(config, &assets, request.render_scale, request.background())?;
    let output = assemble(&mut renderer, &frames, rng, observer, make_encoder)?;

    log::info!(
        "Rendered {} frame(s) in {:.2?}",
        frames.len(),
        start.elapsed()
    );
    Ok(output)
}
