use glam::Vec2;
use rand::Rng;

use super::{Particle, SIDE_MARGIN};
use crate::{
    primitive::{Blob, Canvas, Primitive},
    types::{Bounds, Rgb},
};

const WIND_PUSH: f32 = 0.03;
const FLUTTER: f32 = 0.5;
const FLAKE: Rgb = Rgb(255, 255, 255);

#[derive(Clone, Debug)]
pub struct Snowflake {
    pub pos: Vec2,
    pub fall_speed: f32,
    pub size: f32,
    /// Flutter phase, radians.
    pub phase: f32,
    pub phase_speed: f32,
}

impl Snowflake {
    pub fn new(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            fall_speed: rng.random_range(0.5..=2.0),
            size: rng.random_range(1.5..=3.5),
            phase: rng.random_range(0.0..std::f32::consts::TAU),
            phase_speed: rng.random_range(0.02..=0.08),
        }
    }

    /// A flake entering from just above the top edge.
    pub fn spawn_at_top(bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let x = rng.random_range(-SIDE_MARGIN..=bounds.width + SIDE_MARGIN);
        Self::new(Vec2::new(x, -5.0), rng)
    }
}

impl Particle for Snowflake {
    fn update(&mut self, wind: f32, _rng: &mut impl Rng) {
        self.phase += self.phase_speed;
        self.pos.y += self.fall_speed;
        self.pos.x += self.phase.sin() * FLUTTER + wind * WIND_PUSH;
    }

    fn is_off_screen(&self, bounds: &Bounds) -> bool {
        self.pos.y > bounds.height
            || self.pos.x < -SIDE_MARGIN * 2.0
            || self.pos.x > bounds.width + SIDE_MARGIN * 2.0
    }

    fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.emit(Primitive::Particle(Blob::round(self.pos, self.size, FLAKE)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn spawned_flakes_start_above_the_screen() {
        let mut rng = StdRng::seed_from_u64(21);
        let b = Bounds::new(800.0, 600.0);
        for _ in 0..50 {
            let f = Snowflake::spawn_at_top(&b, &mut rng);
            assert!(f.pos.y < 0.0);
            assert!(!f.is_off_screen(&b));
        }
    }

    #[test]
    fn flake_reaches_the_ground_eventually() {
        let mut rng = StdRng::seed_from_u64(22);
        let b = Bounds::new(800.0, 600.0);
        let mut f = Snowflake::new(Vec2::new(400.0, 0.0), &mut rng);
        let mut ticks = 0;
        while !f.is_off_screen(&b) {
            f.update(0.0, &mut rng);
            ticks += 1;
            assert!(ticks < 2000, "flake never left the screen");
        }
        assert!(f.pos.y > b.height);
    }
}
