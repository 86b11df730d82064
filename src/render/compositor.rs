use rand::Rng;

use crate::{
    foundation::{
        core::{CanvasDims, FrameRGBA},
        error::GrainResult,
    },
    model::stops::ColorStop,
    render::{
        composite::merge_grain,
        gradient::paint_gradient,
        handles::{HandleStyle, paint_handles},
        noise::{NoiseLevel, NoiseMode, fill_noise},
        raster::{new_context, rasterize},
    },
};

/// Per-call inputs besides the stops themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerParams {
    pub dims: CanvasDims,
    pub noise: NoiseLevel,
    pub show_handles: bool,
    pub hovered: Option<usize>,
}

impl LayerParams {
    /// Handles hidden; what export uses.
    pub fn clean(dims: CanvasDims, noise: NoiseLevel) -> Self {
        Self {
            dims,
            noise,
            show_handles: false,
            hovered: None,
        }
    }
}

/// The two on-screen layers. The presentation layer overlays `noise` onto
/// `gradient`; the compositor never blends them itself.
#[derive(Clone, Debug)]
pub struct RenderedLayers {
    /// Premultiplied RGBA8.
    pub gradient: FrameRGBA,
    /// Straight RGBA8 grayscale grain.
    pub noise: FrameRGBA,
    /// Stops skipped because their color failed to parse.
    pub skipped: Vec<usize>,
}

impl RenderedLayers {
    /// Single straight-alpha image using the additive overlay approximation.
    pub fn into_merged(self) -> GrainResult<FrameRGBA> {
        merge_grain(self.gradient.into_straight(), &self.noise)
    }
}

/// Stateless stop-list rasterizer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compositor {
    pub noise_mode: NoiseMode,
    pub handle_style: HandleStyle,
}

impl Compositor {
    pub fn new(noise_mode: NoiseMode, handle_style: HandleStyle) -> Self {
        Self {
            noise_mode,
            handle_style,
        }
    }

    /// Renders the gradient and grain layers.
    ///
    /// The gradient layer is a pure function of `stops` and `params`. The grain
    /// layer draws from `rng`.
    #[tracing::instrument(level = "trace", skip(self, stops, rng), fields(stops = stops.len()))]
    pub fn render<R: Rng + ?Sized>(
        &self,
        stops: &[ColorStop],
        params: LayerParams,
        rng: &mut R,
    ) -> GrainResult<RenderedLayers> {
        let (width, height) = params.dims.pixel_size()?;
        let max_alpha = params.noise.max_alpha(&self.noise_mode)?;

        let mut ctx = new_context(width, height)?;
        let skipped = paint_gradient(&mut ctx, stops, params.dims);
        for &i in &skipped {
            tracing::warn!(index = i, color = %stops[i].color, "skipping stop with invalid color");
        }
        if params.show_handles {
            paint_handles(
                &mut ctx,
                stops,
                params.dims,
                params.hovered,
                self.handle_style,
            );
        }

        let gradient = rasterize(&mut ctx);

        let mut noise = FrameRGBA::transparent(width, height, false);
        fill_noise(&mut noise, max_alpha, rng);

        Ok(RenderedLayers {
            gradient,
            noise,
            skipped,
        })
    }
}
