use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier for a tree in a [`crate::tree::Forest`].
///
/// This is an index into `Forest::trees`, and is only meaningful until the
/// forest is cleared.
pub type TreeId = usize;

/// An opaque 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Size of the visible drawing area in pixels.
///
/// Coordinates follow screen convention: origin top-left, y grows down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }
}
