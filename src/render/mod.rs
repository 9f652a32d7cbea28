pub mod raster;
pub mod shape;
