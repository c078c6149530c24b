//! Drawing primitives emitted by the scene and the branch generator.
//!
//! The core never draws directly. Everything it wants on screen is pushed
//! into a [`Canvas`]; the viewer implements one that paints with egui, and
//! tests use `Vec<Primitive>` to inspect what was emitted.

use glam::Vec2;

use crate::types::Rgb;

/// A straight line with a width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
    pub color: Rgb,
}

/// A filled round shape. `rotation` (radians) only matters for shapes the
/// viewer draws elongated, like falling leaves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blob {
    pub center: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub color: Rgb,
}

impl Blob {
    pub fn round(center: Vec2, radius: f32, color: Rgb) -> Self {
        Self {
            center,
            radius,
            rotation: 0.0,
            color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    /// A tree branch; `level` is 1 for the trunk.
    Branch { segment: Segment, level: u32 },
    /// A leaf attached to a branch tip.
    Leaf(Blob),
    /// A snow clump resting on a branch tip.
    Snow(Blob),
    /// A loose leaf, snowflake or other particle.
    Particle(Blob),
    /// Decorative line work (grass, wings, stems).
    Stroke(Segment),
    /// Decorative filled circle (flower heads, bodies).
    Dot(Blob),
    /// Axis-aligned filled rectangle (sky, ground, snow cover).
    Rect { min: Vec2, max: Vec2, color: Rgb },
}

/// A sink for primitives.
pub trait Canvas {
    fn emit(&mut self, primitive: Primitive);
}

impl Canvas for Vec<Primitive> {
    fn emit(&mut self, primitive: Primitive) {
        self.push(primitive);
    }
}

/// Counts primitives without storing them.
#[derive(Debug, Default)]
pub struct Tally {
    pub branches: usize,
    pub leaves: usize,
    pub snow: usize,
    pub other: usize,
}

impl Canvas for Tally {
    fn emit(&mut self, primitive: Primitive) {
        match primitive {
            Primitive::Branch { .. } => self.branches += 1,
            Primitive::Leaf(_) => self.leaves += 1,
            Primitive::Snow(_) => self.snow += 1,
            _ => self.other += 1,
        }
    }
}
