//! Grass and flowers along the ground line.
//!
//! Placement is generated once per viewport width from a fixed seed; only
//! the sway changes from frame to frame.

use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    primitive::{Blob, Canvas, Primitive, Segment},
    season::Season,
    types::Rgb,
};

/// Average horizontal distance between grass blades.
const BLADE_SPACING: f32 = 6.0;
/// Average horizontal distance between flowers.
const FLOWER_SPACING: f32 = 55.0;
const SWAY_AMPLITUDE: f32 = 3.0;
/// Lean in pixels per unit of wind strength.
const WIND_LEAN: f32 = 0.1;

const FLOWER_HEADS: &[Rgb] = &[
    Rgb(255, 105, 180),
    Rgb(255, 255, 0),
    Rgb(238, 130, 238),
    Rgb(255, 69, 0),
    Rgb(255, 255, 255),
];
const STEM: Rgb = Rgb(34, 120, 34);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrassBlade {
    pub x: f32,
    pub height: f32,
    /// Resting lean of the tip, pixels.
    pub lean: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flower {
    pub x: f32,
    pub stem: f32,
    pub head: Rgb,
}

#[derive(Clone, Debug, Default)]
pub struct Scenery {
    pub blades: Vec<GrassBlade>,
    pub flowers: Vec<Flower>,
    width: f32,
}

/// Horizontal tip offset of something rooted at `x`.
pub fn sway(time: f32, wind: f32, x: f32) -> f32 {
    (time * 2.0 + x * 0.05).sin() * SWAY_AMPLITUDE + wind * WIND_LEAN
}

impl Scenery {
    pub fn generate(width: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let width = width.max(0.0);

        let mut blades = Vec::with_capacity((width / BLADE_SPACING) as usize + 1);
        let mut x = rng.random_range(0.0..BLADE_SPACING);
        while x < width {
            blades.push(GrassBlade {
                x,
                height: rng.random_range(8.0..=18.0),
                lean: rng.random_range(-2.0..=2.0),
            });
            x += BLADE_SPACING * rng.random_range(0.6..=1.4);
        }

        let mut flowers = Vec::new();
        let mut x = rng.random_range(0.0..FLOWER_SPACING);
        while x < width {
            flowers.push(Flower {
                x,
                stem: rng.random_range(14.0..=26.0),
                head: FLOWER_HEADS[rng.random_range(0..FLOWER_HEADS.len())],
            });
            x += FLOWER_SPACING * rng.random_range(0.5..=1.5);
        }

        Self {
            blades,
            flowers,
            width,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        ground_y: f32,
        time: f32,
        wind: f32,
        season: Season,
    ) {
        let grass = grass_color(season);
        for b in &self.blades {
            let tip = Vec2::new(b.x + b.lean + sway(time, wind, b.x), ground_y - b.height);
            canvas.emit(Primitive::Stroke(Segment {
                start: Vec2::new(b.x, ground_y),
                end: tip,
                width: 1.5,
                color: grass,
            }));
        }

        if !season.has_flowers() {
            return;
        }
        for f in &self.flowers {
            let head = Vec2::new(f.x + sway(time, wind, f.x) * 0.6, ground_y - f.stem);
            canvas.emit(Primitive::Stroke(Segment {
                start: Vec2::new(f.x, ground_y),
                end: head,
                width: 1.5,
                color: STEM,
            }));
            canvas.emit(Primitive::Dot(Blob::round(head, 4.0, f.head)));
        }
    }
}

fn grass_color(season: Season) -> Rgb {
    match season {
        Season::Spring => Rgb(124, 200, 60),
        Season::Summer => Rgb(50, 150, 40),
        Season::Autumn => Rgb(150, 140, 60),
        Season::Winter => Rgb(170, 180, 160),
    }
}
