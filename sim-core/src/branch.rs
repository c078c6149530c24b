//! Recursive branch generator.
//!
//! [`draw_branch`] walks a binary tree of branches depth-first and emits one
//! [`Primitive::Branch`] per visible branch, followed by an optional leaf or
//! snow clump at small tips. It keeps no state between calls: every random
//! value comes from a stream keyed on `(seed, remaining_depth, origin.x)`,
//! so redrawing an unchanged tree reproduces it exactly.
//!
//! Growth animation is a gate on the level: a branch at level
//! `original_depth - remaining_depth + 1` is only emitted (and only recursed
//! into) while `level <= revealed_levels`.

use glam::Vec2;
use rand::Rng;

use crate::{
    config::TreeParams,
    primitive::{Blob, Canvas, Primitive, Segment},
    rng::branch_rng,
    season::Season,
    types::Rgb,
};

/// Thickness at which a branch stops swaying entirely.
const SWAY_THICKNESS: f32 = 15.0;
/// Branches thicker than this are drawn in the dark trunk colour.
const BARK_THICKNESS: f32 = 5.0;
/// Tips at this remaining depth or below may carry foliage.
const FOLIAGE_DEPTH: i32 = 3;

const TRUNK_BARK: Rgb = Rgb(101, 67, 33);
const TWIG_BARK: Rgb = Rgb(139, 90, 43);
const SNOW: Rgb = Rgb(250, 250, 255);

/// Per-frame settings shared by every call of one tree.
#[derive(Clone, Copy, Debug)]
pub struct BranchStyle {
    pub branch_angle: f32,
    pub length_ratio: f32,
    pub asymmetry: f32,
    pub season: Season,
    /// Whether tips get leaves / snow at all.
    pub foliage: bool,
}

impl BranchStyle {
    pub fn new(params: &TreeParams, season: Season) -> Self {
        Self {
            branch_angle: params.branch_angle,
            length_ratio: params.length_ratio,
            asymmetry: params.asymmetry,
            season,
            foliage: true,
        }
    }

    pub fn without_foliage(mut self) -> Self {
        self.foliage = false;
        self
    }
}

/// Arguments of a single branch call.
#[derive(Clone, Copy, Debug)]
pub struct BranchArgs {
    pub origin: Vec2,
    pub length: f32,
    /// Direction in radians; `-PI/2` points straight up on screen.
    pub angle: f32,
    pub remaining_depth: i32,
    pub thickness: f32,
    pub revealed_levels: u32,
    pub original_depth: i32,
    pub wind_offset: f32,
    pub seed: u64,
}

impl BranchArgs {
    /// Level of this branch counted from the trunk (trunk = 1).
    pub fn level(&self) -> i32 {
        self.original_depth - self.remaining_depth + 1
    }
}

/// Random values one call consumes, always drawn in this order.
struct Draws {
    asym: f32,
    left_jitter: f32,
    right_jitter: f32,
    left_taper: f32,
    right_taper: f32,
    foliage_roll: f32,
    palette_pick: u32,
    foliage_size: f32,
}

impl Draws {
    fn take(rng: &mut impl Rng, asymmetry: f32) -> Self {
        let unit: f32 = rng.random();
        Self {
            asym: (unit * 2.0 - 1.0) * asymmetry,
            left_jitter: rng.random_range(0.9..1.1),
            right_jitter: rng.random_range(0.9..1.1),
            left_taper: rng.random_range(0.65..=0.75),
            right_taper: rng.random_range(0.65..=0.75),
            foliage_roll: rng.random(),
            palette_pick: rng.random(),
            foliage_size: rng.random_range(4.0..=8.0),
        }
    }
}

/// Emits the branch described by `args` and, recursively, its subtree.
pub fn draw_branch<C: Canvas + ?Sized>(canvas: &mut C, style: &BranchStyle, args: BranchArgs) {
    if args.remaining_depth <= 0 {
        return;
    }

    let level = args.level();
    if level > args.revealed_levels as i32 {
        return;
    }

    let mut rng = branch_rng(args.seed, args.remaining_depth, args.origin.x);
    let d = Draws::take(&mut rng, style.asymmetry);

    let sway = args.wind_offset * (1.0 - args.thickness / SWAY_THICKNESS).max(0.0);
    let angle = args.angle + sway;
    let end = args.origin + Vec2::from_angle(angle) * args.length;

    let color = if args.thickness > BARK_THICKNESS {
        TRUNK_BARK
    } else {
        TWIG_BARK
    };
    canvas.emit(Primitive::Branch {
        segment: Segment {
            start: args.origin,
            end,
            width: args.thickness,
            color,
        },
        level: level as u32,
    });

    if style.foliage
        && args.remaining_depth <= FOLIAGE_DEPTH
        && d.foliage_roll < style.season.foliage_chance()
    {
        emit_foliage(canvas, style.season, end, &d);
    }

    let child = BranchArgs {
        origin: end,
        remaining_depth: args.remaining_depth - 1,
        ..args
    };
    draw_branch(
        canvas,
        style,
        BranchArgs {
            length: args.length * style.length_ratio * d.left_jitter,
            angle: angle - style.branch_angle * (1.0 + d.asym),
            thickness: args.thickness * d.left_taper,
            seed: args.seed.wrapping_add(1),
            ..child
        },
    );
    draw_branch(
        canvas,
        style,
        BranchArgs {
            length: args.length * style.length_ratio * d.right_jitter,
            angle: angle + style.branch_angle * (1.0 - d.asym * 0.5),
            thickness: args.thickness * d.right_taper,
            seed: args.seed.wrapping_add(2),
            ..child
        },
    );
}

fn emit_foliage<C: Canvas + ?Sized>(canvas: &mut C, season: Season, at: Vec2, d: &Draws) {
    let palette = season.leaf_palette();
    if palette.is_empty() {
        // Snow sits on top of the tip rather than centred on it.
        let radius = d.foliage_size * 0.7;
        canvas.emit(Primitive::Snow(Blob::round(
            at - Vec2::new(0.0, radius * 0.5),
            radius,
            SNOW,
        )));
    } else {
        let color = palette[d.palette_pick as usize % palette.len()];
        canvas.emit(Primitive::Leaf(Blob::round(at, d.foliage_size, color)));
    }
}
