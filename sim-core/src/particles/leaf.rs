use glam::Vec2;
use rand::Rng;

use super::{Particle, SIDE_MARGIN};
use crate::{
    primitive::{Blob, Canvas, Primitive},
    types::{Bounds, Rgb},
};

/// Horizontal push per unit of wind strength.
const WIND_PUSH: f32 = 0.02;
const MAX_DRIFT: f32 = 1.0;

/// A leaf tumbling from a tree to the ground.
#[derive(Clone, Debug)]
pub struct FallingLeaf {
    pub pos: Vec2,
    /// Drift (x) and fall speed (y), pixels per tick.
    pub velocity: Vec2,
    pub size: f32,
    /// Degrees.
    pub rotation: f32,
    pub rotation_speed: f32,
    pub color: Rgb,
}

impl FallingLeaf {
    pub fn new(pos: Vec2, color: Rgb, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            velocity: Vec2::new(rng.random_range(-0.3..=0.3), rng.random_range(0.5..=1.5)),
            size: rng.random_range(3..=6) as f32,
            rotation: rng.random_range(0.0..360.0),
            rotation_speed: rng.random_range(-2.0..=2.0),
            color,
        }
    }
}

impl Particle for FallingLeaf {
    fn update(&mut self, wind: f32, rng: &mut impl Rng) {
        self.pos.y += self.velocity.y;
        self.pos.x += self.velocity.x + wind * WIND_PUSH;
        self.rotation = (self.rotation + self.rotation_speed).rem_euclid(360.0);

        self.velocity.x =
            (self.velocity.x + rng.random_range(-0.1..=0.1)).clamp(-MAX_DRIFT, MAX_DRIFT);
    }

    fn is_off_screen(&self, bounds: &Bounds) -> bool {
        self.pos.y > bounds.height
            || self.pos.x < -SIDE_MARGIN
            || self.pos.x > bounds.width + SIDE_MARGIN
    }

    fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.emit(Primitive::Particle(Blob {
            center: self.pos,
            radius: self.size,
            rotation: self.rotation.to_radians(),
            color: self.color,
        }));
    }
}
