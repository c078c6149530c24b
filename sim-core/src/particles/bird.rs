use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{Particle, SIDE_MARGIN};
use crate::{
    primitive::{Canvas, Primitive, Segment},
    types::{Bounds, Rgb},
};

const BIRD: Rgb = Rgb(45, 45, 55);
const BOB_HEIGHT: f32 = 6.0;
const BOB_SPEED: f32 = 0.05;
const WING_SPEED: f32 = 0.3;
const WIND_PUSH: f32 = 0.02;

/// A bird crossing the sky from one side to the other.
#[derive(Clone, Debug)]
pub struct Bird {
    pub pos: Vec2,
    /// `1.0` flies right, `-1.0` flies left.
    pub direction: f32,
    pub speed: f32,
    pub cruise_y: f32,
    pub bob: f32,
    pub wing: f32,
    pub span: f32,
}

impl Bird {
    pub fn new(pos: Vec2, direction: f32, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            direction: direction.signum(),
            speed: rng.random_range(2.0..=3.5),
            cruise_y: pos.y,
            bob: rng.random_range(0.0..TAU),
            wing: rng.random_range(0.0..TAU),
            span: rng.random_range(6.0..=10.0),
        }
    }

    /// A bird entering from a random side in the upper part of the sky.
    pub fn enter(bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let x = if direction > 0.0 {
            -SIDE_MARGIN * 0.5
        } else {
            bounds.width + SIDE_MARGIN * 0.5
        };
        let y = rng.random_range(bounds.height * 0.08..=bounds.height * 0.35);
        Self::new(Vec2::new(x, y), direction, rng)
    }
}

impl Particle for Bird {
    fn update(&mut self, wind: f32, _rng: &mut impl Rng) {
        self.pos.x += self.direction * self.speed + wind * WIND_PUSH;
        self.bob = (self.bob + BOB_SPEED) % TAU;
        self.wing = (self.wing + WING_SPEED) % TAU;
        self.pos.y = self.cruise_y + self.bob.sin() * BOB_HEIGHT;
    }

    fn is_off_screen(&self, bounds: &Bounds) -> bool {
        self.pos.y > bounds.height
            || (self.direction > 0.0 && self.pos.x > bounds.width + SIDE_MARGIN)
            || (self.direction < 0.0 && self.pos.x < -SIDE_MARGIN)
    }

    fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let tip_y = self.wing.sin() * self.span * 0.6;
        for side in [-1.0, 1.0] {
            canvas.emit(Primitive::Stroke(Segment {
                start: self.pos,
                end: self.pos + Vec2::new(side * self.span, -tip_y),
                width: 2.0,
                color: BIRD,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn entering_bird_is_on_screen_and_heads_inward() {
        let mut rng = StdRng::seed_from_u64(41);
        let b = Bounds::new(1000.0, 700.0);
        for _ in 0..20 {
            let bird = Bird::enter(&b, &mut rng);
            assert!(!bird.is_off_screen(&b));
            if bird.direction > 0.0 {
                assert!(bird.pos.x < 0.0);
            } else {
                assert!(bird.pos.x > b.width);
            }
        }
    }

    #[test]
    fn bird_crosses_and_leaves() {
        let mut rng = StdRng::seed_from_u64(42);
        let b = Bounds::new(1000.0, 700.0);
        let mut bird = Bird::enter(&b, &mut rng);
        let mut ticks = 0;
        while !bird.is_off_screen(&b) {
            bird.update(0.0, &mut rng);
            assert!((bird.pos.y - bird.cruise_y).abs() <= BOB_HEIGHT + 1e-3);
            ticks += 1;
            assert!(ticks < 1000);
        }
    }
}
