use crate::foundation::{
    core::Rgba8,
    error::{GrainError, GrainResult},
    math::unit_to_u8,
};

/// Parses `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
pub fn parse_color(s: &str) -> GrainResult<Rgba8> {
    let raw = s.trim();
    let hex = raw.strip_prefix('#').unwrap_or(raw);
    if !hex.is_ascii() {
        return Err(GrainError::validation(format!("invalid color \"{raw}\"")));
    }

    let nibble = |i: usize| -> GrainResult<u8> {
        u8::from_str_radix(&hex[i..i + 1], 16)
            .map(|v| v * 17)
            .map_err(|_| GrainError::validation(format!("invalid color \"{raw}\"")))
    };
    let byte = |i: usize| -> GrainResult<u8> {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| GrainError::validation(format!("invalid color \"{raw}\"")))
    };

    match hex.len() {
        3 => Ok(Rgba8::opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Ok(Rgba8::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Ok(Rgba8::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => Err(GrainError::validation(format!(
            "invalid color \"{raw}\": expected #RGB, #RGBA, #RRGGBB or #RRGGBBAA"
        ))),
    }
}

pub fn is_valid_color(s: &str) -> bool {
    parse_color(s).is_ok()
}

/// `#rrggbb`, lowercase. Alpha is dropped.
pub fn to_hex_lower(c: Rgba8) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// `#rrggbbaa`, lowercase; `#rrggbb` when the color is opaque.
pub fn to_hex_lower_alpha(c: Rgba8) -> String {
    if c.a == 255 {
        return to_hex_lower(c);
    }
    format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
}

/// `#RRGGBB`, uppercase. Alpha is dropped.
pub fn to_hex_upper(c: Rgba8) -> String {
    format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
}

/// HSL with hue in degrees and saturation/lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn from_rgb(c: Rgba8) -> Self {
        let r = f64::from(c.r) / 255.0;
        let g = f64::from(c.g) / 255.0;
        let b = f64::from(c.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;

        if delta == 0.0 {
            return Self {
                h: 0.0,
                s: 0.0,
                l: l * 100.0,
            };
        }

        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Self {
            h: h * 60.0,
            s: s * 100.0,
            l: l * 100.0,
        }
    }

    pub fn to_rgb(self) -> Rgba8 {
        let h = (self.h % 360.0 + 360.0) % 360.0 / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = unit_to_u8(l);
            return Rgba8::opaque(v, v, v);
        }

        fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            if t < 1.0 / 6.0 {
                return p + (q - p) * 6.0 * t;
            }
            if t < 1.0 / 2.0 {
                return q;
            }
            if t < 2.0 / 3.0 {
                return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
            }
            p
        }

        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let p = 2.0 * l - q;

        Rgba8::opaque(
            unit_to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            unit_to_u8(hue_to_rgb(p, q, h)),
            unit_to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_hex_forms() {
        assert_eq!(parse_color("#FFB3BA").unwrap(), Rgba8::opaque(255, 179, 186));
        assert_eq!(parse_color("ffb3ba").unwrap(), Rgba8::opaque(255, 179, 186));
        assert_eq!(parse_color("#f00").unwrap(), Rgba8::opaque(255, 0, 0));
        assert_eq!(parse_color("#f008").unwrap(), Rgba8::new(255, 0, 0, 136));
        assert_eq!(
            parse_color("#0000ff80").unwrap(),
            Rgba8::new(0, 0, 255, 128)
        );
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#", "#12345", "#gggggg", "red", "#ÿÿÿ"] {
            assert!(parse_color(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn hex_formatting_cases() {
        let c = Rgba8::opaque(171, 205, 239);
        assert_eq!(to_hex_lower(c), "#abcdef");
        assert_eq!(to_hex_upper(c), "#ABCDEF");
    }

    #[test]
    fn alpha_hex_only_when_translucent() {
        assert_eq!(to_hex_lower_alpha(Rgba8::opaque(1, 2, 3)), "#010203");
        assert_eq!(to_hex_lower_alpha(Rgba8::new(255, 0, 0, 128)), "#ff000080");
        assert_eq!(
            parse_color(&to_hex_lower_alpha(Rgba8::new(9, 8, 7, 0))).unwrap(),
            Rgba8::new(9, 8, 7, 0)
        );
    }

    #[test]
    fn hsl_primary_colors() {
        let red = Hsl::from_rgb(Rgba8::opaque(255, 0, 0));
        assert!((red.h - 0.0).abs() < 1e-9);
        assert!((red.s - 100.0).abs() < 1e-9);
        assert!((red.l - 50.0).abs() < 1e-9);

        let c = Hsl {
            h: 120.0,
            s: 100.0,
            l: 50.0,
        };
        assert_eq!(c.to_rgb(), Rgba8::opaque(0, 255, 0));
    }

    #[test]
    fn hsl_roundtrip_is_close() {
        for hex in ["#FFB3BA", "#1982C4", "#8D6E63", "#595959"] {
            let c = parse_color(hex).unwrap();
            let back = Hsl::from_rgb(c).to_rgb();
            assert!((i32::from(c.r) - i32::from(back.r)).abs() <= 1);
            assert!((i32::from(c.g) - i32::from(back.g)).abs() <= 1);
            assert!((i32::from(c.b) - i32::from(back.b)).abs() <= 1);
        }
    }
}
