use std::time::Duration;

use crate::{
    animation::lerp::Lerp,
    foundation::{
        core::CanvasDims,
        error::{GrainError, GrainResult},
    },
    model::stops::{ColorStop, StopList},
};

/// Default run length for palette and canvas-size animations.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// Progress is quantized to this many steps when throttling writes.
const QUANT_STEPS: f64 = 30.0;

/// Values a transition can run between.
pub trait Transitionable: Lerp + Clone + std::fmt::Debug {
    /// Rejects endpoint pairs that cannot be blended.
    fn check_compatible(_from: &Self, _to: &Self) -> GrainResult<()> {
        Ok(())
    }
}

impl Lerp for StopList {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let stops: Vec<ColorStop> = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| ColorStop::lerp(x, y, t))
            .collect();
        StopList::from_vec_unchecked(stops)
    }
}

impl Transitionable for StopList {
    fn check_compatible(from: &Self, to: &Self) -> GrainResult<()> {
        if from.len() != to.len() {
            return Err(GrainError::validation(format!(
                "palette transition needs equal lengths, got {} -> {}",
                from.len(),
                to.len()
            )));
        }
        Ok(())
    }
}

impl Transitionable for CanvasDims {
    fn check_compatible(_from: &Self, to: &Self) -> GrainResult<()> {
        to.validate()
    }
}

/// How often intermediate values are handed back to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WritePolicy {
    /// Every tick.
    EveryTick,
    /// Only when the progress, quantized to 30 steps, is a multiple of `n`.
    Cadence(u32),
}

impl WritePolicy {
    fn allows(self, progress: f64) -> bool {
        match self {
            Self::EveryTick => true,
            Self::Cadence(n) => {
                let step = (progress * QUANT_STEPS).round() as u32;
                step % n.max(1) == 0
            }
        }
    }
}

/// One in-flight animation between two snapshots.
#[derive(Clone, Debug)]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
    pub started: Duration,
    pub duration: Duration,
}

impl<T: Transitionable> Transition<T> {
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Duration) -> T {
        T::lerp(&self.from, &self.to, self.progress(now))
    }
}

/// What a tick asks the owner to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Tick<T> {
    /// Nothing running.
    Idle,
    /// Running, but this tick is throttled.
    Hold,
    /// Running; overwrite the model with this value.
    Write(T),
    /// Finished; write this exact target. The engine is Idle again.
    Finished(T),
}

impl<T> Tick<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Write(v) | Self::Finished(v) => Some(v),
            Self::Idle | Self::Hold => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// Idle/Running state machine driven by an external frame clock.
///
/// There is no cancel: starting again replaces the in-flight run, beginning
/// from whatever value the caller passes as `from`.
#[derive(Clone, Debug)]
pub struct TransitionEngine<T> {
    active: Option<Transition<T>>,
    duration: Duration,
    policy: WritePolicy,
}

impl<T: Transitionable> TransitionEngine<T> {
    pub fn new(duration: Duration, policy: WritePolicy) -> Self {
        Self {
            active: None,
            duration,
            policy,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Transition<T>> {
        self.active.as_ref()
    }

    pub fn target(&self) -> Option<&T> {
        self.active.as_ref().map(|t| &t.to)
    }

    pub fn start(&mut self, from: T, to: T, now: Duration) -> GrainResult<()> {
        T::check_compatible(&from, &to)?;
        if self.active.is_some() {
            tracing::debug!("superseding in-flight transition");
        }
        tracing::debug!(duration_ms = self.duration.as_millis() as u64, "transition started");
        self.active = Some(Transition {
            from,
            to,
            started: now,
            duration: self.duration,
        });
        Ok(())
    }

    pub fn tick(&mut self, now: Duration) -> Tick<T> {
        let Some(run) = self.active.as_ref() else {
            return Tick::Idle;
        };

        let progress = run.progress(now);
        if progress >= 1.0 {
            let to = run.to.clone();
            self.active = None;
            tracing::debug!("transition finished");
            return Tick::Finished(to);
        }

        if !self.policy.allows(progress) {
            return Tick::Hold;
        }
        tracing::trace!(progress, "transition write");
        Tick::Write(run.sample(now))
    }
}
