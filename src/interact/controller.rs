use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    animation::transition::{Tick, TransitionEngine, WritePolicy},
    config::{Design, EditorSettings},
    export::encode::{ExportFormat, ExportRequest, ExportedImage, export_image},
    foundation::{
        core::{CanvasDims, FrameRGBA, Point},
        error::{GrainError, GrainResult},
    },
    interact::hit_test::hit_test,
    model::stops::{ColorStop, StopList},
    palette::{PaletteTheme, pastel_stop, randomize_palette},
    presets::{AspectRatio, Resolution},
    render::{
        compositor::{Compositor, LayerParams, RenderedLayers},
        noise::NoiseLevel,
    },
};

/// "Call me back before the next repaint", supplied by the host UI.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Scheduler for hosts that poll `tick` on their own clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopScheduler;

impl FrameScheduler for NoopScheduler {
    fn request_frame(&mut self) {}
}

/// A drawing target owned by the host UI.
pub trait Surface {
    fn present(&mut self, frame: &FrameRGBA) -> GrainResult<()>;
}

/// Owns the stop model and turns pointer, timer and UI events into model
/// writes and redraws.
///
/// Dragging and palette animation are kept apart: a pointer-down during a
/// palette transition does not grab a stop, and starting a palette transition
/// releases any grabbed stop.
pub struct Editor {
    stops: StopList,
    dims: CanvasDims,
    aspect: AspectRatio,
    noise: NoiseLevel,
    show_handles: bool,
    hovered: Option<usize>,
    dragging: Option<usize>,
    palette: TransitionEngine<StopList>,
    resize: TransitionEngine<CanvasDims>,
    settings: EditorSettings,
    compositor: Compositor,
    rng: StdRng,
    scheduler: Box<dyn FrameScheduler>,
    dirty: bool,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("stops", &self.stops)
            .field("dims", &self.dims)
            .field("noise", &self.noise)
            .field("hovered", &self.hovered)
            .field("dragging", &self.dragging)
            .field("palette_running", &self.palette.is_running())
            .field("resize_running", &self.resize.is_running())
            .finish_non_exhaustive()
    }
}

impl Editor {
    pub fn new(settings: EditorSettings, scheduler: Box<dyn FrameScheduler>) -> GrainResult<Self> {
        Self::with_design(Design::default(), settings, scheduler)
    }

    pub fn with_design(
        design: Design,
        settings: EditorSettings,
        scheduler: Box<dyn FrameScheduler>,
    ) -> GrainResult<Self> {
        settings.validate()?;
        design.noise.percentage(&settings.noise_mode)?;
        let duration = settings.transition_duration();
        Ok(Self {
            stops: design.stops,
            dims: design.aspect.preview_dims(),
            aspect: design.aspect,
            noise: design.noise,
            show_handles: design.show_handles,
            hovered: None,
            dragging: None,
            palette: TransitionEngine::new(
                duration,
                WritePolicy::Cadence(settings.palette_write_cadence),
            ),
            resize: TransitionEngine::new(duration, WritePolicy::EveryTick),
            compositor: settings.compositor(),
            settings,
            rng: StdRng::from_entropy(),
            scheduler,
            dirty: true,
        })
    }

    /// Replaces the grain RNG with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn stops(&self) -> &StopList {
        &self.stops
    }

    pub fn dims(&self) -> CanvasDims {
        self.dims
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    pub fn noise(&self) -> NoiseLevel {
        self.noise
    }

    pub fn show_handles(&self) -> bool {
        self.show_handles
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn is_transitioning(&self) -> bool {
        self.palette.is_running()
    }

    /// Set while a canvas-size animation runs; aspect changes are refused meanwhile.
    pub fn is_transitioning_aspect_ratio(&self) -> bool {
        self.resize.is_running()
    }

    pub fn design(&self) -> Design {
        Design {
            stops: self.stops.clone(),
            noise: self.noise,
            aspect: self.aspect,
            show_handles: self.show_handles,
        }
    }

    // ---- stop model ----

    pub fn set_stops(&mut self, stops: StopList) -> GrainResult<()> {
        self.check_length_change(stops.len())?;
        if stops.len() != self.stops.len() {
            self.hovered = None;
            self.dragging = None;
        }
        self.stops = stops;
        self.dirty = true;
        Ok(())
    }

    /// Appends a stop and returns its index.
    pub fn add_stop(
        &mut self,
        color: impl Into<String>,
        position: Point,
        size: f64,
    ) -> GrainResult<usize> {
        self.check_length_change(self.stops.len() + 1)?;
        self.stops.push(ColorStop::new(color, position, size))?;
        self.dirty = true;
        tracing::debug!(len = self.stops.len(), "stop added");
        Ok(self.stops.len() - 1)
    }

    /// Appends a centered stop with a random pastel color.
    pub fn add_pastel_stop(&mut self) -> GrainResult<usize> {
        let stop = pastel_stop(&mut self.rng);
        self.add_stop(stop.color, stop.position, stop.size)
    }

    pub fn remove_stop(&mut self, index: usize) -> GrainResult<ColorStop> {
        self.check_length_change(self.stops.len().saturating_sub(1))?;
        let removed = self.stops.remove(index)?;
        self.hovered = None;
        self.dragging = None;
        self.dirty = true;
        tracing::debug!(index, len = self.stops.len(), "stop removed");
        Ok(removed)
    }

    pub fn update_stop_color(&mut self, index: usize, color: impl Into<String>) -> GrainResult<()> {
        self.stops.set_color(index, color)?;
        self.dirty = true;
        Ok(())
    }

    pub fn update_stop_size(&mut self, index: usize, size: f64) -> GrainResult<()> {
        self.stops.set_size(index, size)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_noise(&mut self, level: NoiseLevel) -> GrainResult<()> {
        level.percentage(&self.settings.noise_mode)?;
        if self.noise != level {
            self.noise = level;
            self.dirty = true;
        }
        Ok(())
    }

    pub fn set_show_handles(&mut self, show: bool) {
        if self.show_handles != show {
            self.show_handles = show;
            self.dirty = true;
        }
    }

    fn check_length_change(&self, new_len: usize) -> GrainResult<()> {
        if self.palette.is_running() && new_len != self.stops.len() {
            return Err(GrainError::validation(
                "stop count cannot change while a palette transition is running",
            ));
        }
        Ok(())
    }

    // ---- transitions ----

    /// Animates from the current stops to `target`. A run already in flight is
    /// replaced, starting from the current (possibly mid-blend) stops.
    pub fn start_palette_transition(&mut self, target: StopList, now: Duration) -> GrainResult<()> {
        self.palette.start(self.stops.clone(), target, now)?;
        if let Some(index) = self.dragging.take() {
            tracing::debug!(index, "drag released by palette transition");
        }
        self.scheduler.request_frame();
        Ok(())
    }

    /// Randomizes toward `theme`. Returns `false` if a palette run is in flight.
    pub fn randomize_palette(&mut self, theme: PaletteTheme, now: Duration) -> GrainResult<bool> {
        if self.palette.is_running() {
            return Ok(false);
        }
        let target = randomize_palette(&self.stops, theme, &mut self.rng);
        self.start_palette_transition(target, now)?;
        Ok(true)
    }

    /// Animates the canvas size. Returns `false` if a resize is already running.
    pub fn start_dimension_transition(
        &mut self,
        width: f64,
        height: f64,
        now: Duration,
    ) -> GrainResult<bool> {
        let target = CanvasDims::new(width, height)?;
        if self.resize.is_running() {
            return Ok(false);
        }
        self.resize.start(self.dims, target, now)?;
        self.scheduler.request_frame();
        Ok(true)
    }

    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio, now: Duration) -> GrainResult<bool> {
        if self.resize.is_running() {
            return Ok(false);
        }
        let target = aspect.preview_dims();
        let started = self.start_dimension_transition(target.width, target.height, now)?;
        if started {
            self.aspect = aspect;
        }
        Ok(started)
    }

    /// Frame callback. Applies the palette write, then the resize write, and
    /// asks for another frame while either is running.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.palette.tick(now) {
            Tick::Write(stops) | Tick::Finished(stops) => {
                self.stops = stops;
                self.dirty = true;
            }
            Tick::Idle | Tick::Hold => {}
        }
        match self.resize.tick(now) {
            Tick::Write(dims) | Tick::Finished(dims) => {
                self.dims = dims;
                self.dirty = true;
            }
            Tick::Idle | Tick::Hold => {}
        }

        let running = self.palette.is_running() || self.resize.is_running();
        if running {
            self.scheduler.request_frame();
        }
        running
    }

    // ---- pointer ----

    /// Grabs the first stop near the pointer, in canvas pixels.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<usize> {
        if self.palette.is_running() {
            return None;
        }
        let hit = hit_test(
            self.stops.as_slice(),
            Point::new(x, y),
            self.dims,
            self.settings.drag_mode(),
        );
        if let Some(index) = hit {
            tracing::debug!(index, "drag started");
            self.dragging = Some(index);
        }
        hit
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let pointer = Point::new(x, y);
        if let Some(index) = self.dragging {
            let p = self.dims.to_normalized(pointer);
            if self.stops.set_position(index, p).is_ok() {
                self.dirty = true;
            }
            return;
        }

        let hovered = hit_test(
            self.stops.as_slice(),
            pointer,
            self.dims,
            self.settings.hover_mode(),
        );
        if hovered != self.hovered {
            self.hovered = hovered;
            self.dirty = true;
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(index) = self.dragging.take() {
            tracing::debug!(index, "drag ended");
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
        if self.hovered.take().is_some() {
            self.dirty = true;
        }
    }

    // ---- output ----

    /// Renders the current stops with explicit view parameters.
    pub fn render(
        &mut self,
        dims: CanvasDims,
        noise: NoiseLevel,
        show_handles: bool,
        hovered: Option<usize>,
    ) -> GrainResult<RenderedLayers> {
        let params = LayerParams {
            dims,
            noise,
            show_handles,
            hovered,
        };
        self.compositor
            .render(self.stops.as_slice(), params, &mut self.rng)
    }

    pub fn render_current(&mut self) -> GrainResult<RenderedLayers> {
        self.render(self.dims, self.noise, self.show_handles, self.hovered)
    }

    /// Pushes fresh layers to the surfaces if anything changed. The model is
    /// untouched on failure and the next call retries.
    pub fn redraw(
        &mut self,
        gradient: &mut dyn Surface,
        noise: &mut dyn Surface,
    ) -> GrainResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        let layers = self.render_current()?;
        gradient
            .present(&layers.gradient)
            .map_err(|e| as_resource("gradient", e))?;
        noise
            .present(&layers.noise)
            .map_err(|e| as_resource("noise", e))?;
        self.dirty = false;
        Ok(true)
    }

    pub fn export_image(
        &mut self,
        width: u32,
        height: u32,
        format: ExportFormat,
    ) -> GrainResult<ExportedImage> {
        let request = ExportRequest {
            jpeg_quality: self.settings.jpeg_quality,
            ..ExportRequest::new(width, height, format)
        };
        export_image(
            &self.compositor,
            self.stops.as_slice(),
            self.noise,
            request,
            &mut self.rng,
        )
    }

    /// Exports at a named resolution, portrait for the phone ratio.
    pub fn export_preset(
        &mut self,
        resolution: Resolution,
        format: ExportFormat,
    ) -> GrainResult<ExportedImage> {
        let (w, h) = resolution.output_size(self.aspect);
        self.export_image(w, h, format)
    }
}

fn as_resource(layer: &str, err: GrainError) -> GrainError {
    match err {
        GrainError::Resource(_) => err,
        other => GrainError::resource(format!("present {layer} layer: {other}")),
    }
}
