use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{Particle, SIDE_MARGIN};
use crate::{
    primitive::{Blob, Canvas, Primitive, Segment},
    types::{Bounds, Rgb},
};

const WING_COLORS: &[Rgb] = &[
    Rgb(255, 182, 193),
    Rgb(255, 215, 0),
    Rgb(186, 85, 211),
    Rgb(135, 206, 250),
    Rgb(255, 255, 255),
];
const BODY: Rgb = Rgb(40, 30, 20);
/// Largest heading change per tick, radians.
const MAX_TURN: f32 = 0.25;
const WIND_PUSH: f32 = 0.01;

/// A butterfly wandering around the canopy.
#[derive(Clone, Debug)]
pub struct Butterfly {
    pub pos: Vec2,
    /// Direction of travel, radians.
    pub heading: f32,
    pub speed: f32,
    pub flap: f32,
    pub flap_speed: f32,
    pub size: f32,
    pub color: Rgb,
}

impl Butterfly {
    pub fn new(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            heading: rng.random_range(0.0..TAU),
            speed: rng.random_range(0.8..=1.5),
            flap: rng.random_range(0.0..TAU),
            flap_speed: rng.random_range(0.3..=0.5),
            size: rng.random_range(4.0..=6.0),
            color: WING_COLORS[rng.random_range(0..WING_COLORS.len())],
        }
    }

    /// Current wing opening in `0.0..=1.0`.
    pub fn wing_open(&self) -> f32 {
        self.flap.sin().abs()
    }
}

impl Particle for Butterfly {
    fn update(&mut self, wind: f32, rng: &mut impl Rng) {
        self.heading += rng.random_range(-MAX_TURN..=MAX_TURN);
        self.pos += Vec2::from_angle(self.heading) * self.speed;
        self.pos.x += wind * WIND_PUSH;
        self.flap = (self.flap + self.flap_speed) % TAU;
    }

    fn is_off_screen(&self, bounds: &Bounds) -> bool {
        self.pos.y > bounds.height
            || self.pos.y < -SIDE_MARGIN
            || self.pos.x < -SIDE_MARGIN
            || self.pos.x > bounds.width + SIDE_MARGIN
    }

    fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let spread = self.size * (0.3 + 0.7 * self.wing_open());
        for side in [-1.0, 1.0] {
            canvas.emit(Primitive::Dot(Blob::round(
                self.pos + Vec2::new(side * spread, -self.size * 0.3),
                self.size * 0.8,
                self.color,
            )));
        }
        canvas.emit(Primitive::Stroke(Segment {
            start: self.pos - Vec2::new(0.0, self.size * 0.6),
            end: self.pos + Vec2::new(0.0, self.size * 0.6),
            width: 1.5,
            color: BODY,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn moves_at_its_own_speed_without_wind() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut b = Butterfly::new(Vec2::new(300.0, 300.0), &mut rng);
        for _ in 0..20 {
            let before = b.pos;
            b.update(0.0, &mut rng);
            assert!((before.distance(b.pos) - b.speed).abs() < 1e-3);
        }
    }

    #[test]
    fn wings_stay_within_unit_opening() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut b = Butterfly::new(Vec2::new(300.0, 300.0), &mut rng);
        for _ in 0..100 {
            b.update(0.0, &mut rng);
            assert!((0.0..=1.0).contains(&b.wing_open()));
        }
    }

    #[test]
    fn leaving_the_sides_is_off_screen() {
        let mut rng = StdRng::seed_from_u64(33);
        let bounds = Bounds::new(800.0, 600.0);
        let mut b = Butterfly::new(Vec2::new(-SIDE_MARGIN - 1.0, 300.0), &mut rng);
        assert!(b.is_off_screen(&bounds));
        b.pos.x = 400.0;
        assert!(!b.is_off_screen(&bounds));
    }
}
