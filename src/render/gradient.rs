use vello_cpu::{
    RenderContext,
    peniko::{self, Gradient},
};

use crate::{
    foundation::core::{CanvasDims, Rgba8},
    model::{color::parse_color, stops::ColorStop},
    render::raster::{full_rect, to_cpu_color, to_cpu_point},
};

/// Paints the base fill and every accent gradient, in list order.
///
/// Returns the indices of stops skipped because their color did not parse.
pub(crate) fn paint_gradient(
    ctx: &mut RenderContext,
    stops: &[ColorStop],
    dims: CanvasDims,
) -> Vec<usize> {
    let mut skipped = Vec::new();

    let Some((base, accents)) = stops.split_first() else {
        return skipped;
    };

    match parse_color(&base.color) {
        Ok(c) => {
            ctx.set_paint(to_cpu_color(c));
            let rect = full_rect(ctx);
            ctx.fill_rect(&rect);
        }
        Err(_) => skipped.push(0),
    }

    for (offset, stop) in accents.iter().enumerate() {
        match parse_color(&stop.color) {
            Ok(c) => paint_radial(ctx, stop, c, dims),
            Err(_) => skipped.push(offset + 1),
        }
    }
    skipped
}

/// Radial gradient from `color` at the stop's center to the same hue at zero
/// alpha at `max_edge * size`, padded transparent beyond.
fn paint_radial(ctx: &mut RenderContext, stop: &ColorStop, color: Rgba8, dims: CanvasDims) {
    let radius = dims.max_edge() * stop.radius_factor();
    if radius <= 0.0 || color.a == 0 {
        return;
    }

    let ramp = [
        peniko::ColorStop::from((0.0, to_cpu_color(color))),
        peniko::ColorStop::from((1.0, to_cpu_color(color.with_alpha(0)))),
    ];
    let paint = Gradient::new_radial(to_cpu_point(dims.to_pixels(stop.position)), radius as f32)
        .with_extend(peniko::Extend::Pad)
        .with_stops(ramp.as_slice());
    ctx.set_paint(paint);
    let rect = full_rect(ctx);
    ctx.fill_rect(&rect);
}
