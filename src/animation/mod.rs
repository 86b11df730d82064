pub mod lerp;
pub mod transition;
