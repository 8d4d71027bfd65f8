//! Layout calculation for photo pages
//!
//! This module handles the geometry of placing a photo on a page:
//! - Page dimensions (paper size and orientation)
//! - Contain-fit scaling inside the printable area
//! - Centering on the full page

mod placement;
mod types;

pub use placement::*;
pub use types::*;
