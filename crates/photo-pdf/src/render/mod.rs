//! Raster preparation for export
//!
//! This module handles everything between a stored photo and the bytes the
//! document writer embeds:
//! - Rotating pixels and re-encoding them
//! - Reading JPEG frame headers
//! - Splitting decoded PNGs into color and alpha planes

mod raster;
mod rotate;

pub use raster::*;
pub use rotate::*;
