use rand::Rng;

use crate::foundation::{
    core::FrameRGBA,
    error::{GrainError, GrainResult},
};

/// Grain percentages for the stepped slider, indexed by level.
pub const DEFAULT_NOISE_STEPS: [f64; 5] = [0.0, 12.5, 25.0, 37.5, 50.0];

/// How a [`NoiseLevel`] is interpreted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseMode {
    /// Discrete levels, each mapping to a maximum alpha percentage.
    Stepped { percentages: Vec<f64> },
    /// Any percentage in 0..=100.
    Continuous,
}

impl Default for NoiseMode {
    fn default() -> Self {
        Self::Stepped {
            percentages: DEFAULT_NOISE_STEPS.to_vec(),
        }
    }
}

impl NoiseMode {
    pub fn validate(&self) -> GrainResult<()> {
        match self {
            Self::Stepped { percentages } => {
                if percentages.is_empty() {
                    return Err(GrainError::validation("noise steps must be non-empty"));
                }
                for &p in percentages {
                    check_percent(p)?;
                }
                Ok(())
            }
            Self::Continuous => Ok(()),
        }
    }

    /// Highest level index for stepped mode.
    pub fn max_step(&self) -> Option<u8> {
        match self {
            Self::Stepped { percentages } => Some(percentages.len().saturating_sub(1) as u8),
            Self::Continuous => None,
        }
    }
}

/// Grain strength as the UI reports it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseLevel {
    Step(u8),
    Percent(f64),
}

impl Default for NoiseLevel {
    fn default() -> Self {
        Self::Step(0)
    }
}

impl NoiseLevel {
    /// Resolves to a percentage in 0..=100.
    ///
    /// A `Percent` is accepted in stepped mode as well; a `Step` needs a table.
    pub fn percentage(self, mode: &NoiseMode) -> GrainResult<f64> {
        match (self, mode) {
            (Self::Step(i), NoiseMode::Stepped { percentages }) => percentages
                .get(usize::from(i))
                .copied()
                .ok_or_else(|| {
                    GrainError::validation(format!(
                        "noise step {i} out of range (0..={})",
                        percentages.len().saturating_sub(1)
                    ))
                }),
            (Self::Step(i), NoiseMode::Continuous) => Err(GrainError::validation(format!(
                "noise step {i} given but noise mode is continuous"
            ))),
            (Self::Percent(p), _) => {
                check_percent(p)?;
                Ok(p)
            }
        }
    }

    /// Alpha byte ceiling for the grain layer.
    pub fn max_alpha(self, mode: &NoiseMode) -> GrainResult<u8> {
        Ok(max_alpha_for_percent(self.percentage(mode)?))
    }
}

fn check_percent(p: f64) -> GrainResult<()> {
    if !p.is_finite() || !(0.0..=100.0).contains(&p) {
        return Err(GrainError::validation(format!(
            "noise percentage {p} must be within 0..=100"
        )));
    }
    Ok(())
}

pub fn max_alpha_for_percent(percent: f64) -> u8 {
    (percent.clamp(0.0, 100.0) / 100.0 * 255.0).floor() as u8
}

/// Fills `frame` with independent per-pixel grain: uniform gray in 0..=255 and
/// uniform alpha in 0..=`max_alpha`. The buffer is straight alpha.
pub fn fill_noise<R: Rng + ?Sized>(frame: &mut FrameRGBA, max_alpha: u8, rng: &mut R) {
    frame.premultiplied = false;
    if max_alpha == 0 {
        frame.data.fill(0);
        return;
    }
    for px in frame.data.chunks_exact_mut(4) {
        let gray: u8 = rng.r#gen();
        px[0] = gray;
        px[1] = gray;
        px[2] = gray;
        px[3] = rng.gen_range(0..=max_alpha);
    }
}
