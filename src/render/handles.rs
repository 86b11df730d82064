use vello_cpu::{
    RenderContext,
    kurbo::{Circle, Rect, Shape as _, Stroke},
};

use crate::{
    foundation::{
        core::{CanvasDims, Rgba8},
        math::unit_to_u8,
    },
    model::{color::parse_color, stops::ColorStop},
    render::raster::{to_cpu_color, to_cpu_point},
};

/// Geometry and colors of the draggable stop markers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleStyle {
    /// Disc radius in canvas pixels, independent of canvas scale.
    pub radius_px: f64,
    /// Spread of the hover glow.
    pub glow_blur_px: f64,
    pub outline: Rgba8,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self {
            radius_px: 10.0,
            glow_blur_px: 20.0,
            outline: Rgba8::WHITE,
        }
    }
}

// Opacity of the glow color before blurring.
const GLOW_PEAK: f64 = 0.75;
const OUTLINE_WIDTH: f64 = 1.0;
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Draws one handle per stop, in list order, on top of whatever the context holds.
pub(crate) fn paint_handles(
    ctx: &mut RenderContext,
    stops: &[ColorStop],
    dims: CanvasDims,
    hovered: Option<usize>,
    style: HandleStyle,
) {
    ctx.set_stroke(Stroke::new(OUTLINE_WIDTH));
    for (i, stop) in stops.iter().enumerate() {
        let Ok(color) = parse_color(&stop.color) else {
            continue;
        };
        let center = to_cpu_point(dims.to_pixels(stop.position));
        if hovered == Some(i) && style.glow_blur_px > 0.0 {
            let r = style.radius_px;
            let glow = color.with_alpha(unit_to_u8(GLOW_PEAK));
            ctx.set_paint(to_cpu_color(glow));
            ctx.fill_blurred_rounded_rect(
                &Rect::new(center.x - r, center.y - r, center.x + r, center.y + r),
                r as f32,
                (style.glow_blur_px / 2.0) as f32,
            );
        }

        let disc = Circle::new(center, style.radius_px).to_path(FLATTEN_TOLERANCE);
        ctx.set_paint(to_cpu_color(color));
        ctx.fill_path(&disc);
        ctx.set_paint(to_cpu_color(style.outline));
        ctx.stroke_path(&disc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        foundation::core::{FrameRGBA, Point},
        render::raster::{full_rect, new_context, rasterize},
    };

    fn on_black(w: u32, h: u32, stops: &[ColorStop], hovered: Option<usize>) -> FrameRGBA {
        let dims = CanvasDims::new(f64::from(w), f64::from(h)).unwrap();
        let mut ctx = new_context(w, h).unwrap();
        ctx.set_paint(to_cpu_color(Rgba8::BLACK));
        let rect = full_rect(&ctx);
        ctx.fill_rect(&rect);
        paint_handles(&mut ctx, stops, dims, hovered, HandleStyle::default());
        rasterize(&mut ctx)
    }

    fn stops() -> Vec<ColorStop> {
        vec![
            ColorStop::new("#ff0000", Point::new(0.25, 0.5), 1.0),
            ColorStop::new("#00ff00", Point::new(0.75, 0.5), 1.0),
        ]
    }

    #[test]
    fn discs_are_drawn_at_stop_positions() {
        let f = on_black(80, 40, &stops(), None);
        assert_eq!(f.pixel(20, 20).unwrap(), [255, 0, 0, 255]);
        assert_eq!(f.pixel(60, 20).unwrap(), [0, 255, 0, 255]);
        // Outside every handle.
        assert_eq!(f.pixel(40, 2).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn outline_is_light() {
        let f = on_black(80, 40, &stops(), None);
        // Pixel center (26.5, 27.5) sits on the ring of the first handle.
        let px = f.pixel(26, 27).unwrap();
        assert!(px[1] > 100 && px[2] > 100, "{px:?}");
    }

    #[test]
    fn hover_adds_glow_outside_the_ring() {
        let plain = on_black(80, 40, &stops(), None);
        let hovered = on_black(80, 40, &stops(), Some(0));

        // 14px left of the first handle's center.
        assert_eq!(plain.pixel(6, 20).unwrap(), [0, 0, 0, 255]);
        assert!(hovered.pixel(6, 20).unwrap()[0] > 0);
        // Disc interiors are unchanged by the glow underneath.
        assert_eq!(plain.pixel(20, 20), hovered.pixel(20, 20));
        assert_eq!(plain.pixel(60, 20), hovered.pixel(60, 20));
    }

    #[test]
    fn handles_off_canvas_are_clipped() {
        let s = vec![ColorStop::new("#ffffff", Point::new(1.0, 1.0), 1.0)];
        let f = on_black(10, 10, &s, Some(0));
        assert_eq!(f.pixel(9, 9).unwrap(), [255, 255, 255, 255]);
    }

    #[test]
    fn invalid_colors_draw_no_handle() {
        let s = vec![ColorStop::new("nope", Point::new(0.5, 0.5), 1.0)];
        let f = on_black(30, 30, &s, Some(0));
        assert!(f.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    }
}
