use crate::{
    foundation::core::{CanvasDims, Point, Rgba8},
    model::{
        color::{parse_color, to_hex_lower_alpha},
        stops::ColorStop,
    },
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for CanvasDims {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            width: a.width + (b.width - a.width) * t,
            height: a.height + (b.height - a.height) * t,
        }
    }
}

impl Lerp for Rgba8 {
    /// Per-channel blend in byte space; no gamma handling.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

impl Lerp for ColorStop {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            color: interpolate_color(&a.color, &b.color, t).unwrap_or_else(|| a.color.clone()),
            position: <Point as Lerp>::lerp(&a.position, &b.position, t),
            size: <f64 as Lerp>::lerp(&a.size, &b.size, t),
        }
    }
}

/// Blends two hex colors channel by channel, alpha included, returning
/// lowercase `#rrggbb`, or `#rrggbbaa` when the blend is translucent.
///
/// Halves round away from zero, so black to white at 0.5 gives `#808080`.
/// Returns `None` if either side fails to parse.
pub fn interpolate_color(from: &str, to: &str, t: f64) -> Option<String> {
    let a = parse_color(from).ok()?;
    let b = parse_color(to).ok()?;
    Some(to_hex_lower_alpha(Rgba8::lerp(&a, &b, t)))
}
