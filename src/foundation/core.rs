use crate::foundation::error::{GrainError, GrainResult};

pub use kurbo::{Point, Vec2};

/// Largest edge length accepted for any pixel buffer.
pub const MAX_EDGE_PX: u32 = 16_384;

/// Canvas size in pixels. Fractional while a dimension transition is running.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasDims {
    pub width: f64,
    pub height: f64,
}

impl CanvasDims {
    pub fn new(width: f64, height: f64) -> GrainResult<Self> {
        let dims = Self { width, height };
        dims.validate()?;
        Ok(dims)
    }

    pub fn validate(&self) -> GrainResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(GrainError::validation("canvas dims must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(GrainError::validation("canvas dims must be > 0"));
        }
        Ok(())
    }

    /// Longest edge; the reference length for stop radii.
    pub fn max_edge(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Integer buffer size. Fractional sizes truncate like a canvas element does.
    pub fn pixel_size(&self) -> GrainResult<(u32, u32)> {
        self.validate()?;
        let w = (self.width.floor() as u64).max(1);
        let h = (self.height.floor() as u64).max(1);
        if w > u64::from(MAX_EDGE_PX) || h > u64::from(MAX_EDGE_PX) {
            return Err(GrainError::resource(format!(
                "canvas {w}x{h} exceeds the {MAX_EDGE_PX}px edge limit"
            )));
        }
        Ok((w as u32, h as u32))
    }

    /// Pixel coordinates of a normalized point.
    pub fn to_pixels(&self, p: Point) -> Point {
        Point::new(p.x * self.width, p.y * self.height)
    }

    /// Normalized coordinates of a pixel-space point.
    pub fn to_normalized(&self, p: Point) -> Point {
        Point::new(p.x / self.width, p.y / self.height)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            crate::foundation::math::mul_div255_u8(u16::from(c), u16::from(a))
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// RGBA8 pixel buffer, row-major, 4 bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn transparent(width: u32, height: u32, premultiplied: bool) -> Self {
        let len = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            data: vec![0; len],
            premultiplied,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Converts to straight alpha; a no-op for straight buffers.
    pub fn into_straight(mut self) -> Self {
        if !self.premultiplied {
            return self;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 {
                px[..3].fill(0);
                continue;
            }
            if a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
            }
        }
        self.premultiplied = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_reject_non_positive() {
        assert!(CanvasDims::new(0.0, 10.0).is_err());
        assert!(CanvasDims::new(10.0, -1.0).is_err());
        assert!(CanvasDims::new(f64::NAN, 10.0).is_err());
        assert!(CanvasDims::new(300.0, 650.0).is_ok());
    }

    #[test]
    fn fractional_dims_truncate() {
        let d = CanvasDims::new(300.9, 0.4).unwrap();
        assert_eq!(d.pixel_size().unwrap(), (300, 1));
    }

    #[test]
    fn oversized_dims_are_resource_errors() {
        let d = CanvasDims::new(100_000.0, 10.0).unwrap();
        assert!(matches!(d.pixel_size(), Err(GrainError::Resource(_))));
    }

    #[test]
    fn normalized_pixel_roundtrip() {
        let d = CanvasDims::new(200.0, 100.0).unwrap();
        let p = d.to_pixels(Point::new(0.5, 0.25));
        assert_eq!(p, Point::new(100.0, 25.0));
        assert_eq!(d.to_normalized(p), Point::new(0.5, 0.25));
    }

    #[test]
    fn unpremultiply_restores_straight_values() {
        let mut f = FrameRGBA::transparent(1, 1, true);
        f.data.copy_from_slice(&Rgba8::new(200, 100, 0, 128).to_premul());
        let s = f.into_straight();
        let px = s.pixel(0, 0).unwrap();
        assert!((i32::from(px[0]) - 200).abs() <= 1);
        assert!((i32::from(px[1]) - 100).abs() <= 1);
        assert_eq!(px[3], 128);
        assert!(!s.premultiplied);
    }
}
