use std::str::FromStr;

use crate::foundation::{
    core::CanvasDims,
    error::{GrainError, GrainResult},
};

/// On-screen canvas width shared by every aspect preset.
pub const PREVIEW_WIDTH: f64 = 300.0;

/// Canvas aspect ratios offered by the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "9:19.5")]
    Phone,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:2")]
    Classic,
}

impl AspectRatio {
    pub const ALL: [Self; 5] = [
        Self::Phone,
        Self::Square,
        Self::Widescreen,
        Self::Standard,
        Self::Classic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Phone => "9:19.5",
            Self::Square => "1:1",
            Self::Widescreen => "16:9",
            Self::Standard => "4:3",
            Self::Classic => "3:2",
        }
    }

    /// (width units, height units).
    pub fn ratio(self) -> (f64, f64) {
        match self {
            Self::Phone => (9.0, 19.5),
            Self::Square => (1.0, 1.0),
            Self::Widescreen => (16.0, 9.0),
            Self::Standard => (4.0, 3.0),
            Self::Classic => (3.0, 2.0),
        }
    }

    /// Preview canvas size for this ratio.
    pub fn preview_dims(self) -> CanvasDims {
        match self {
            Self::Phone => CanvasDims {
                width: PREVIEW_WIDTH,
                height: 650.0,
            },
            other => {
                let (w, h) = other.ratio();
                CanvasDims {
                    width: PREVIEW_WIDTH,
                    height: PREVIEW_WIDTH / w * h,
                }
            }
        }
    }
}

impl FromStr for AspectRatio {
    type Err = GrainError;

    fn from_str(s: &str) -> GrainResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.label() == s)
            .or(match s.to_ascii_lowercase().as_str() {
                "phone" | "iphone" => Some(Self::Phone),
                "square" => Some(Self::Square),
                "widescreen" => Some(Self::Widescreen),
                "standard" => Some(Self::Standard),
                "classic" => Some(Self::Classic),
                _ => None,
            })
            .ok_or_else(|| GrainError::validation(format!("unknown aspect ratio '{s}'")))
    }
}

/// Export resolutions offered by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Hd,
    FullHd,
    #[serde(rename = "4k")]
    Uhd4k,
}

impl Resolution {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hd => "hd",
            Self::FullHd => "fullhd",
            Self::Uhd4k => "4k",
        }
    }

    pub fn landscape_size(self) -> (u32, u32) {
        match self {
            Self::Hd => (1280, 720),
            Self::FullHd => (1920, 1080),
            Self::Uhd4k => (3840, 2160),
        }
    }

    /// Output size for a design. The phone ratio keeps the width and derives a
    /// portrait height; every other ratio exports the landscape size.
    pub fn output_size(self, aspect: AspectRatio) -> (u32, u32) {
        let (width, height) = self.landscape_size();
        match aspect {
            AspectRatio::Phone => {
                let (w, h) = AspectRatio::Phone.ratio();
                (width, (f64::from(width) * (h / w)).round() as u32)
            }
            _ => (width, height),
        }
    }
}

impl FromStr for Resolution {
    type Err = GrainError;

    fn from_str(s: &str) -> GrainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hd" | "720p" => Ok(Self::Hd),
            "fullhd" | "1080p" => Ok(Self::FullHd),
            "4k" | "uhd" => Ok(Self::Uhd4k),
            other => Err(GrainError::validation(format!(
                "unknown resolution '{other}'"
            ))),
        }
    }
}
