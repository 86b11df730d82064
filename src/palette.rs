//! Theme palettes and palette randomization.
//!
//! A randomized palette keeps the stop count, re-centers the base fill and
//! scatters the accents. Colors are drawn from a theme's base set and then
//! pushed into the theme's saturation/lightness band in HSL.

use std::str::FromStr;

use rand::{Rng, seq::SliceRandom};

use crate::{
    foundation::{
        core::{Point, Rgba8},
        error::{GrainError, GrainResult},
    },
    model::{
        color::{Hsl, parse_color, to_hex_lower, to_hex_upper},
        stops::{ColorStop, DEFAULT_SIZE, StopList},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteTheme {
    #[default]
    Pastel,
    Vibrant,
    Earthy,
    Neon,
    Monochrome,
}

impl PaletteTheme {
    pub const ALL: [Self; 5] = [
        Self::Pastel,
        Self::Vibrant,
        Self::Earthy,
        Self::Neon,
        Self::Monochrome,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pastel => "pastel",
            Self::Vibrant => "vibrant",
            Self::Earthy => "earthy",
            Self::Neon => "neon",
            Self::Monochrome => "monochrome",
        }
    }

    pub fn base_colors(self) -> &'static [&'static str] {
        match self {
            Self::Pastel => &["#FFB3BA", "#BAFFC9", "#BAE1FF", "#FFFFBA", "#FFDFBA"],
            Self::Vibrant => &["#FF595E", "#FFCA3A", "#8AC926", "#1982C4", "#6A4C93"],
            Self::Earthy => &[
                "#8D6E63", "#A1887F", "#6D4C41", "#795548", "#D7CCC8", "#BCAAA4", "#9C7C65",
                "#E6D0B8", "#C8B39E", "#A87B4F", "#76624C", "#4E342E", "#5D4037", "#3E2723",
                "#8B4513", "#D2691E", "#CD853F", "#DEB887", "#F4A460", "#D2B48C",
            ],
            Self::Neon => &["#FF00FF", "#00FFFF", "#FF00CC", "#00FF00", "#FF3300"],
            Self::Monochrome => &["#F2F2F2", "#BFBFBF", "#8C8C8C", "#595959", "#262626"],
        }
    }

    /// Moves `base` into this theme's HSL band. Returns uppercase `#RRGGBB`.
    pub fn theme_color<R: Rng + ?Sized>(self, base: Rgba8, rng: &mut R) -> String {
        let c = Hsl::from_rgb(base);
        let out = match self {
            Self::Pastel => Hsl {
                h: c.h,
                s: c.s.min(70.0),
                l: c.l.max(70.0),
            },
            Self::Vibrant => Hsl {
                h: c.h,
                s: c.s.max(70.0),
                l: c.l.clamp(40.0, 60.0),
            },
            Self::Earthy => Hsl {
                h: (c.h + rng.gen_range(-10.0..10.0) + 360.0) % 360.0,
                s: (c.s + rng.gen_range(-5.0..5.0)).clamp(20.0, 60.0),
                l: (c.l + rng.gen_range(-5.0..5.0)).clamp(20.0, 70.0),
            },
            Self::Neon => Hsl {
                h: f64::from(rng.gen_range(0u16..360)),
                s: 100.0,
                l: 50.0,
            },
            Self::Monochrome => Hsl {
                h: 0.0,
                s: 0.0,
                l: c.l,
            },
        };
        to_hex_upper(out.to_rgb())
    }

    /// One themed color drawn from the base set.
    pub fn random_color<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        let base = self
            .base_colors()
            .choose(rng)
            .and_then(|hex| parse_color(hex).ok())
            .unwrap_or(Rgba8::WHITE);
        self.theme_color(base, rng)
    }
}

impl FromStr for PaletteTheme {
    type Err = GrainError;

    fn from_str(s: &str) -> GrainResult<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| GrainError::validation(format!("unknown palette theme '{s}'")))
    }
}

/// New stop list of the same length: base centered at size 1, accents at
/// random positions with sizes in [0.5, 2.0).
pub fn randomize_palette<R: Rng + ?Sized>(
    current: &StopList,
    theme: PaletteTheme,
    rng: &mut R,
) -> StopList {
    let stops = (0..current.len())
        .map(|i| {
            let color = theme.random_color(rng);
            if i == 0 {
                ColorStop::new(color, Point::new(0.5, 0.5), 1.0)
            } else {
                let position = Point::new(rng.gen_range(0.0..=1.0), rng.gen_range(0.0..=1.0));
                ColorStop::new(color, position, rng.gen_range(0.5..2.0))
            }
        })
        .collect();
    StopList::from_vec_unchecked(stops)
}

/// Light random color, each channel in 200..=254.
pub fn pastel_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut channel = || rng.gen_range(200u8..=254);
    to_hex_lower(Rgba8::opaque(channel(), channel(), channel()))
}

/// A centered stop with a random pastel color and default size.
pub fn pastel_stop<R: Rng + ?Sized>(rng: &mut R) -> ColorStop {
    ColorStop::new(pastel_color(rng), Point::new(0.5, 0.5), DEFAULT_SIZE)
}
