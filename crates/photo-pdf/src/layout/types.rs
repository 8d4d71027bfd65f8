//! Layout data types
//!
//! These types carry layout results from the placement math to the
//! document writer.

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Where an image lands on its page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Drawn image rectangle in page coordinates (origin bottom-left)
    pub rect: Rect,
    /// Uniform scale from image pixels to points
    pub scale: f32,
}

/// Full layout of one output page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlan {
    pub page_width: f32,
    pub page_height: f32,
    pub placement: Placement,
}
