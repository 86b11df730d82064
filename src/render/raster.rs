use vello_cpu::{Pixmap, RenderContext, kurbo, peniko};

use crate::foundation::{
    core::{FrameRGBA, Point, Rgba8},
    error::{GrainError, GrainResult},
};

/// Drawing context sized to a frame buffer.
pub(crate) fn new_context(width: u32, height: u32) -> GrainResult<RenderContext> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GrainError::resource(format!("canvas width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GrainError::resource(format!("canvas height {height} exceeds u16")))?;
    Ok(RenderContext::new(w, h))
}

/// Flushes pending draws and reads the premultiplied result back.
pub(crate) fn rasterize(ctx: &mut RenderContext) -> FrameRGBA {
    let (width, height) = (ctx.width(), ctx.height());
    let mut pixmap = Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    FrameRGBA {
        width: u32::from(width),
        height: u32::from(height),
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    }
}

pub(crate) fn to_cpu_point(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

pub(crate) fn to_cpu_color(c: Rgba8) -> peniko::Color {
    peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Whole-canvas rectangle for a context.
pub(crate) fn full_rect(ctx: &RenderContext) -> kurbo::Rect {
    kurbo::Rect::new(0.0, 0.0, f64::from(ctx.width()), f64::from(ctx.height()))
}
