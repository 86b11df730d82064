//! Layered radial-gradient compositor with a grain overlay.
//!
//! A design is an ordered list of color stops over a canvas. The first stop
//! fills the background, every later stop adds a soft radial glow, and a
//! random grain layer sits on top. The crate is organized around:
//!
//! - [`StopList`], the validated stop model
//! - [`Compositor`], which rasterizes the gradient and grain layers
//! - [`Editor`], which turns pointer and timer events into model writes,
//!   animated transitions and redraws
//! - [`export_image`], which merges the layers and encodes PNG or JPEG
#![forbid(unsafe_code)]

pub mod animation;
pub mod config;
pub mod export;
pub mod foundation;
pub mod interact;
pub mod logging;
pub mod model;
pub mod palette;
pub mod presets;
pub mod render;

pub use crate::animation::lerp::{Lerp, interpolate_color};
pub use crate::animation::transition::{
    DEFAULT_TRANSITION, Tick, Transition, TransitionEngine, Transitionable, WritePolicy,
};
pub use crate::config::{Design, EditorSettings};
pub use crate::export::encode::{
    ExportFormat, ExportRequest, ExportedImage, encode, export_image, suggested_filename,
};
pub use crate::foundation::core::{CanvasDims, FrameRGBA, Point, Rgba8, Vec2};
pub use crate::foundation::error::{GrainError, GrainResult};
pub use crate::interact::controller::{Editor, FrameScheduler, NoopScheduler, Surface};
pub use crate::interact::hit_test::{HitMode, hit_test};
pub use crate::model::color::{Hsl, is_valid_color, parse_color};
pub use crate::model::stops::{ColorStop, StopList};
pub use crate::palette::{PaletteTheme, randomize_palette};
pub use crate::presets::{AspectRatio, Resolution};
pub use crate::render::compositor::{Compositor, LayerParams, RenderedLayers};
pub use crate::render::handles::HandleStyle;
pub use crate::render::noise::{NoiseLevel, NoiseMode};
