pub mod color;
pub mod stops;
