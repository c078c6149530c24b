//! Paints core [`Primitive`]s with an egui [`egui::Painter`].

use std::f32::consts::TAU;

use egui::{Color32, Pos2, Shape, Stroke};
use glam::Vec2;
use sim_core::{
    primitive::{Blob, Canvas, Primitive},
    types::Rgb,
};

/// Falling leaves are drawn as ellipses this much narrower than long.
const LEAF_ASPECT: f32 = 0.55;
const ELLIPSE_POINTS: usize = 10;

pub fn color(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

/// Converts a scene position (origin at the canvas corner) to screen space.
pub fn to_screen(origin: Pos2, p: Vec2) -> Pos2 {
    origin + egui::vec2(p.x, p.y)
}

/// Converts a screen position to scene space.
pub fn to_scene(origin: Pos2, p: Pos2) -> Vec2 {
    let d = p - origin;
    Vec2::new(d.x, d.y)
}

pub struct PainterCanvas<'a> {
    painter: &'a egui::Painter,
    origin: Pos2,
}

impl<'a> PainterCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, origin: Pos2) -> Self {
        Self { painter, origin }
    }

    fn pos(&self, p: Vec2) -> Pos2 {
        to_screen(self.origin, p)
    }

    fn ellipse(&self, blob: &Blob) -> Shape {
        let (sin, cos) = blob.rotation.sin_cos();
        let points = (0..ELLIPSE_POINTS)
            .map(|i| {
                let t = i as f32 / ELLIPSE_POINTS as f32 * TAU;
                let local = Vec2::new(t.cos() * blob.radius, t.sin() * blob.radius * LEAF_ASPECT);
                let rotated = Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
                self.pos(blob.center + rotated)
            })
            .collect();
        Shape::convex_polygon(points, color(blob.color), Stroke::NONE)
    }
}

impl Canvas for PainterCanvas<'_> {
    fn emit(&mut self, primitive: Primitive) {
        match primitive {
            Primitive::Branch { segment, .. } | Primitive::Stroke(segment) => {
                self.painter.line_segment(
                    [self.pos(segment.start), self.pos(segment.end)],
                    Stroke::new(segment.width.max(1.0), color(segment.color)),
                );
            }
            Primitive::Leaf(blob) | Primitive::Snow(blob) | Primitive::Dot(blob) => {
                self.painter
                    .circle_filled(self.pos(blob.center), blob.radius, color(blob.color));
            }
            Primitive::Particle(blob) => {
                if blob.rotation == 0.0 {
                    self.painter
                        .circle_filled(self.pos(blob.center), blob.radius, color(blob.color));
                } else {
                    self.painter.add(self.ellipse(&blob));
                }
            }
            Primitive::Rect { min, max, color: c } => {
                let rect = egui::Rect::from_min_max(self.pos(min), self.pos(max));
                self.painter.rect_filled(rect, 0.0, color(c));
            }
        }
    }
}
