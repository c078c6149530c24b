//! Ambient particles: falling leaves, snow, butterflies and birds.
//!
//! Particles never interact. Each type moves itself in
//! [`Particle::update`] and reports when it has left the screen; a
//! [`ParticleSystem`] owns one type, caps how many exist and drops the ones
//! that are gone after every update.

pub mod bird;
pub mod butterfly;
pub mod leaf;
pub mod snow;

use rand::Rng;

use crate::{primitive::Canvas, types::Bounds};

pub use bird::Bird;
pub use butterfly::Butterfly;
pub use leaf::FallingLeaf;
pub use snow::Snowflake;

/// How far outside the screen sideways a particle may drift before it is
/// dropped.
pub const SIDE_MARGIN: f32 = 40.0;

pub trait Particle {
    /// Moves the particle by one tick.
    fn update(&mut self, wind: f32, rng: &mut impl Rng);

    /// `true` once the particle can no longer come back into view.
    fn is_off_screen(&self, bounds: &Bounds) -> bool;

    fn render<C: Canvas + ?Sized>(&self, canvas: &mut C);
}

#[derive(Debug)]
pub struct ParticleSystem<P> {
    particles: Vec<P>,
    capacity: usize,
}

impl<P: Particle> ParticleSystem<P> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds a particle unless the system is full. Returns whether it was added.
    pub fn spawn(&mut self, particle: P) -> bool {
        if self.is_full() {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Updates every particle, then drops the off-screen ones.
    ///
    /// Returns how many were removed.
    pub fn update(&mut self, wind: f32, bounds: &Bounds, rng: &mut impl Rng) -> usize {
        for p in &mut self.particles {
            p.update(wind, rng);
        }
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_off_screen(bounds));
        before - self.particles.len()
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for p in &self.particles {
            p.render(canvas);
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;
    use glam::Vec2;
    use rand::{SeedableRng, rngs::StdRng};

    fn bounds() -> Bounds {
        Bounds::new(1000.0, 700.0)
    }

    #[test]
    fn spawn_respects_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sys = ParticleSystem::with_capacity(2);
        for _ in 0..2 {
            assert!(sys.spawn(FallingLeaf::new(Vec2::new(10.0, 10.0), Rgb::WHITE, &mut rng)));
        }
        assert!(sys.is_full());
        assert!(!sys.spawn(FallingLeaf::new(Vec2::new(10.0, 10.0), Rgb::WHITE, &mut rng)));
        assert_eq!(sys.len(), 2);
    }

    #[test]
    fn particle_below_screen_is_removed_in_one_update() {
        let mut rng = StdRng::seed_from_u64(2);
        let b = bounds();
        let mut sys = ParticleSystem::with_capacity(10);
        sys.spawn(FallingLeaf::new(Vec2::new(500.0, 100.0), Rgb::WHITE, &mut rng));
        sys.spawn(FallingLeaf::new(Vec2::new(500.0, b.height + 1.0), Rgb::WHITE, &mut rng));

        let removed = sys.update(0.0, &b, &mut rng);
        assert_eq!(removed, 1);
        assert_eq!(sys.len(), 1);
        assert!(sys.iter().all(|p| p.pos.y < b.height));
    }

    #[test]
    fn every_kind_falls_off_the_bottom() {
        let mut rng = StdRng::seed_from_u64(3);
        let b = bounds();
        let below = Vec2::new(500.0, b.height + 5.0);

        assert!(FallingLeaf::new(below, Rgb::WHITE, &mut rng).is_off_screen(&b));
        assert!(Snowflake::new(below, &mut rng).is_off_screen(&b));
        assert!(Butterfly::new(below, &mut rng).is_off_screen(&b));
        assert!(Bird::new(below, 1.0, &mut rng).is_off_screen(&b));
    }

    #[test]
    fn render_emits_one_primitive_group_per_particle() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut sys = ParticleSystem::with_capacity(10);
        for i in 0..3 {
            sys.spawn(Snowflake::new(Vec2::new(i as f32 * 10.0, 0.0), &mut rng));
        }
        let mut out = Vec::new();
        sys.render(&mut out);
        assert_eq!(out.len(), 3);
    }
}
