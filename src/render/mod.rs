pub mod composite;
pub mod compositor;
pub(crate) mod gradient;
pub mod handles;
pub mod noise;
pub(crate) mod raster;
