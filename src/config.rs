use std::{path::Path, time::Duration};

use crate::{
    foundation::error::{GrainError, GrainResult},
    interact::hit_test::HitMode,
    model::stops::StopList,
    presets::AspectRatio,
    render::{
        compositor::Compositor,
        handles::HandleStyle,
        noise::{NoiseLevel, NoiseMode},
    },
};

/// Tunables for the editor core. Every field has a default, so a settings
/// file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorSettings {
    pub noise_mode: NoiseMode,
    pub handle_radius_px: f64,
    pub drag_tolerance: f64,
    pub transition_ms: u64,
    pub palette_write_cadence: u32,
    pub glow_blur_px: f64,
    pub jpeg_quality: u8,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            noise_mode: NoiseMode::default(),
            handle_radius_px: 10.0,
            drag_tolerance: 0.05,
            transition_ms: 300,
            palette_write_cadence: 3,
            glow_blur_px: 20.0,
            jpeg_quality: 92,
        }
    }
}

impl EditorSettings {
    pub fn from_json_str(s: &str) -> GrainResult<Self> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> GrainResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GrainError::Other(anyhow::Error::new(e).context(format!(
                "read settings '{}'",
                path.display()
            )))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> GrainResult<()> {
        self.noise_mode.validate()?;
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(GrainError::validation(format!("{name} must be > 0, got {v}")))
            }
        };
        positive("handle_radius_px", self.handle_radius_px)?;
        positive("drag_tolerance", self.drag_tolerance)?;
        if !self.glow_blur_px.is_finite() || self.glow_blur_px < 0.0 {
            return Err(GrainError::validation("glow_blur_px must be >= 0"));
        }
        if self.transition_ms == 0 {
            return Err(GrainError::validation("transition_ms must be > 0"));
        }
        if self.palette_write_cadence == 0 {
            return Err(GrainError::validation("palette_write_cadence must be >= 1"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(GrainError::validation("jpeg_quality must be within 1..=100"));
        }
        Ok(())
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn drag_mode(&self) -> HitMode {
        HitMode::Drag {
            tolerance: self.drag_tolerance,
        }
    }

    pub fn hover_mode(&self) -> HitMode {
        HitMode::Hover {
            radius_px: self.handle_radius_px,
        }
    }

    pub fn handle_style(&self) -> HandleStyle {
        HandleStyle {
            radius_px: self.handle_radius_px,
            glow_blur_px: self.glow_blur_px,
            ..HandleStyle::default()
        }
    }

    pub fn compositor(&self) -> Compositor {
        Compositor::new(self.noise_mode.clone(), self.handle_style())
    }
}

/// Everything needed to reproduce a design outside the editor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Design {
    pub stops: StopList,
    #[serde(default)]
    pub noise: NoiseLevel,
    #[serde(default)]
    pub aspect: AspectRatio,
    #[serde(default)]
    pub show_handles: bool,
}

impl Default for Design {
    fn default() -> Self {
        Self {
            stops: StopList::pastel_default(),
            noise: NoiseLevel::default(),
            aspect: AspectRatio::default(),
            show_handles: false,
        }
    }
}

impl Design {
    pub fn from_json_str(s: &str) -> GrainResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> GrainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
