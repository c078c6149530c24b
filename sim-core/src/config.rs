//! Tunable parameters read by the branch generator every frame.
//!
//! Every field has a bounded range matching the viewer's sliders. Values
//! coming from outside (settings files, UI) go through
//! [`TreeParams::clamped`] so the generator never sees an out-of-range
//! value.

use std::f32::consts::PI;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Branch angle range in degrees.
pub const ANGLE_DEG_RANGE: RangeInclusive<f32> = 10.0..=60.0;
/// Recursion depth range (trunk counts as level 1).
pub const DEPTH_RANGE: RangeInclusive<u32> = 5..=13;
/// Child length as a fraction of the parent.
pub const LENGTH_RATIO_RANGE: RangeInclusive<f32> = 0.5..=0.8;
/// Trunk length in pixels.
pub const TRUNK_LENGTH_RANGE: RangeInclusive<f32> = 80.0..=200.0;
/// Growth speed as a fraction of [`GROWTH_PER_TICK`].
pub const GROWTH_SPEED_RANGE: RangeInclusive<f32> = 0.1..=1.0;
/// Asymmetry as a fraction of the branch angle.
pub const ASYMMETRY_RANGE: RangeInclusive<f32> = 0.0..=0.4;
/// Wind strength; negative values blow to the left.
pub const WIND_RANGE: RangeInclusive<f32> = -50.0..=50.0;

/// Growth levels revealed per tick at full growth speed.
pub const GROWTH_PER_TICK: f32 = 0.1;

/// Parameters shared by every tree in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Angle between a branch and each of its children, in radians.
    pub branch_angle: f32,
    pub length_ratio: f32,
    pub trunk_length: f32,
    pub recursion_depth: u32,
    pub growth_speed: f32,
    pub asymmetry: f32,
    pub wind: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            branch_angle: PI / 6.0,
            length_ratio: 0.67,
            trunk_length: 120.0,
            recursion_depth: 10,
            growth_speed: 0.8,
            asymmetry: 0.15,
            wind: 0.0,
        }
    }
}

fn clamp_range(v: f32, r: &RangeInclusive<f32>) -> f32 {
    v.clamp(*r.start(), *r.end())
}

impl TreeParams {
    /// Returns a copy with every field clamped into its slider range.
    pub fn clamped(&self) -> Self {
        let min_angle = ANGLE_DEG_RANGE.start().to_radians();
        let max_angle = ANGLE_DEG_RANGE.end().to_radians();
        Self {
            branch_angle: self.branch_angle.clamp(min_angle, max_angle),
            length_ratio: clamp_range(self.length_ratio, &LENGTH_RATIO_RANGE),
            trunk_length: clamp_range(self.trunk_length, &TRUNK_LENGTH_RANGE),
            recursion_depth: self
                .recursion_depth
                .clamp(*DEPTH_RANGE.start(), *DEPTH_RANGE.end()),
            growth_speed: clamp_range(self.growth_speed, &GROWTH_SPEED_RANGE),
            asymmetry: clamp_range(self.asymmetry, &ASYMMETRY_RANGE),
            wind: clamp_range(self.wind, &WIND_RANGE),
        }
    }

    /// Rejects NaN or infinite fields, then clamps the rest.
    ///
    /// Used for values that come from a file, where a clamp alone would
    /// silently turn a NaN into a range bound.
    pub fn validated(&self) -> Result<Self> {
        let fields = [
            ("branch_angle", self.branch_angle),
            ("length_ratio", self.length_ratio),
            ("trunk_length", self.trunk_length),
            ("growth_speed", self.growth_speed),
            ("asymmetry", self.asymmetry),
            ("wind", self.wind),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidParam { name, value });
            }
        }
        Ok(self.clamped())
    }

    pub fn branch_angle_degrees(&self) -> f32 {
        self.branch_angle.to_degrees()
    }

    pub fn set_branch_angle_degrees(&mut self, degrees: f32) {
        self.branch_angle = clamp_range(degrees, &ANGLE_DEG_RANGE).to_radians();
    }

    /// Growth levels a tree gains per simulation tick.
    pub fn growth_per_tick(&self) -> f32 {
        self.growth_speed * GROWTH_PER_TICK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_inside_ranges() {
        let p = TreeParams::default();
        assert_eq!(p, p.clamped());
        assert!((p.branch_angle_degrees() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn default_growth_step_is_eight_hundredths() {
        let step = TreeParams::default().growth_per_tick();
        assert!((step - 0.08).abs() < 1e-6);
    }

    #[test]
    fn clamped_pulls_every_field_into_range() {
        let p = TreeParams {
            branch_angle: 3.0,
            length_ratio: 0.1,
            trunk_length: 500.0,
            recursion_depth: 40,
            growth_speed: 0.0,
            asymmetry: -1.0,
            wind: 99.0,
        }
        .clamped();

        assert!((p.branch_angle_degrees() - 60.0).abs() < 1e-3);
        assert_eq!(p.length_ratio, 0.5);
        assert_eq!(p.trunk_length, 200.0);
        assert_eq!(p.recursion_depth, 13);
        assert_eq!(p.growth_speed, 0.1);
        assert_eq!(p.asymmetry, 0.0);
        assert_eq!(p.wind, 50.0);
    }

    #[test]
    fn validated_rejects_nan() {
        let p = TreeParams {
            wind: f32::NAN,
            ..TreeParams::default()
        };
        match p.validated() {
            Err(Error::InvalidParam { name, .. }) => assert_eq!(name, "wind"),
            other => panic!("expected InvalidParam, got {other:?}"),
        }
    }

    #[test]
    fn set_branch_angle_degrees_clamps() {
        let mut p = TreeParams::default();
        p.set_branch_angle_degrees(5.0);
        assert!((p.branch_angle_degrees() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let p: TreeParams = serde_json::from_str(r#"{ "wind": 12.0 }"#).unwrap();
        assert_eq!(p.wind, 12.0);
        assert_eq!(p.recursion_depth, TreeParams::default().recursion_depth);
    }
}
