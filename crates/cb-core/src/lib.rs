pub mod config;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod raster;

pub use config::SurfaceConfig;
pub use error::RasterError;
pub use geometry::{Point, Rect, ScaleParams, SurfaceFrame, Transform};
pub use id::{ElementId, IdCounter};
pub use model::*;
pub use raster::{Raster, RasterSnapshot, rgba_len};
