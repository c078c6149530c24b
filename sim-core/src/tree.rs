//! Planted trees and their growth state.
//!
//! A [`Tree`] only stores where it stands, how long its trunk is, its seed,
//! and how far its growth animation has progressed. The branch geometry is
//! regenerated from that every frame by [`crate::branch::draw_branch`].

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::Rng;

use crate::{
    branch::{BranchArgs, BranchStyle, draw_branch},
    config::TreeParams,
    primitive::Canvas,
    types::TreeId,
};

/// Trunk width at the base, in pixels.
pub const TRUNK_THICKNESS: f32 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    /// Base of the trunk.
    pub pos: Vec2,
    pub trunk_length: f32,
    pub seed: u64,
    /// Levels revealed so far, `0.0..=recursion_depth`.
    pub growth: f32,
    pub growing: bool,
}

impl Tree {
    pub fn new(pos: Vec2, trunk_length: f32, seed: u64) -> Self {
        Self {
            pos,
            trunk_length,
            seed,
            growth: 0.0,
            growing: true,
        }
    }

    /// Advances growth by `step` levels, capping at `max_depth`.
    ///
    /// Returns `true` on the tick the tree becomes fully grown.
    pub fn advance(&mut self, step: f32, max_depth: u32) -> bool {
        if !self.growing {
            return false;
        }
        let cap = max_depth as f32;
        self.growth += step.max(0.0);
        if self.growth >= cap {
            self.growth = cap;
            self.growing = false;
            return true;
        }
        false
    }

    /// Restarts the growth animation from nothing.
    pub fn reset(&mut self) {
        self.growth = 0.0;
        self.growing = true;
    }

    /// Re-applies the growth cap after the depth limit changed.
    ///
    /// Growth above the new cap is cut down to it; a fully grown tree whose
    /// cap was raised starts growing again.
    pub fn sync_depth(&mut self, max_depth: u32) {
        let cap = max_depth as f32;
        if self.growth >= cap {
            self.growth = cap;
            self.growing = false;
        } else if !self.growing {
            self.growing = true;
        }
    }

    /// Number of recursion levels currently visible.
    pub fn revealed_levels(&self) -> u32 {
        self.growth.floor() as u32
    }

    pub fn is_fully_grown(&self) -> bool {
        !self.growing
    }

    pub fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        params: &TreeParams,
        style: &BranchStyle,
        wind_offset: f32,
    ) {
        let depth = params.recursion_depth as i32;
        draw_branch(
            canvas,
            style,
            BranchArgs {
                origin: self.pos,
                length: self.trunk_length,
                angle: -FRAC_PI_2,
                remaining_depth: depth,
                thickness: TRUNK_THICKNESS,
                revealed_levels: self.revealed_levels(),
                original_depth: depth,
                wind_offset,
                seed: self.seed,
            },
        );
    }
}

/// All planted trees, drawn in insertion order.
#[derive(Debug, Default)]
pub struct Forest {
    pub trees: Vec<Tree>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plant(&mut self, tree: Tree) -> TreeId {
        let id = self.trees.len();
        self.trees.push(tree);
        id
    }

    pub fn clear(&mut self) {
        self.trees.clear();
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Advances every growing tree. Returns the ids that finished this tick.
    pub fn grow(&mut self, params: &TreeParams) -> Vec<TreeId> {
        let step = params.growth_per_tick();
        self.trees
            .iter_mut()
            .enumerate()
            .filter_map(|(id, t)| t.advance(step, params.recursion_depth).then_some(id))
            .collect()
    }

    pub fn restart_growth(&mut self) {
        for t in &mut self.trees {
            t.reset();
        }
    }

    pub fn sync_depth(&mut self, max_depth: u32) {
        for t in &mut self.trees {
            t.sync_depth(max_depth);
        }
    }

    /// Scales every trunk after the trunk length setting moved.
    pub fn rescale_trunks(&mut self, old: f32, new: f32) {
        if old <= 0.0 || old == new {
            return;
        }
        let factor = new / old;
        for t in &mut self.trees {
            t.trunk_length *= factor;
        }
    }

    pub fn randomize_seeds(&mut self, rng: &mut impl Rng) {
        for t in &mut self.trees {
            t.seed = rng.random();
        }
    }

    /// Mean growth progress in `0.0..=1.0`, for status display.
    pub fn progress(&self, max_depth: u32) -> f32 {
        if self.trees.is_empty() || max_depth == 0 {
            return 0.0;
        }
        let total: f32 = self.trees.iter().map(|t| t.growth).sum();
        total / (self.trees.len() as f32 * max_depth as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{primitive::Tally, season::Season};
    use rand::{SeedableRng, rngs::StdRng};

    fn tree() -> Tree {
        Tree::new(Vec2::new(500.0, 600.0), 120.0, 42)
    }

    #[test]
    fn growth_is_monotonic_and_capped() {
        let mut t = tree();
        let mut last = t.growth;
        let mut finished = 0;
        for _ in 0..500 {
            if t.advance(0.08, 10) {
                finished += 1;
            }
            assert!(t.growth >= last);
            assert!(t.growth <= 10.0);
            last = t.growth;
        }
        assert_eq!(finished, 1);
        assert_eq!(t.growth, 10.0);
        assert!(!t.growing);
    }

    #[test]
    fn fully_grown_tree_stops_advancing() {
        let mut t = tree();
        t.advance(100.0, 7);
        assert!(t.is_fully_grown());
        assert!(!t.advance(1.0, 7));
        assert_eq!(t.growth, 7.0);
    }

    #[test]
    fn reset_restarts_growth() {
        let mut t = tree();
        t.advance(100.0, 7);
        t.reset();
        assert_eq!(t.growth, 0.0);
        assert!(t.growing);
        assert_eq!(t.revealed_levels(), 0);
    }

    #[test]
    fn sync_depth_clamps_and_resumes() {
        let mut t = tree();
        t.advance(100.0, 10);

        t.sync_depth(6);
        assert_eq!(t.growth, 6.0);
        assert!(!t.growing);

        t.sync_depth(12);
        assert!(t.growing);
        t.advance(100.0, 12);
        assert_eq!(t.growth, 12.0);
    }

    #[test]
    fn revealed_levels_floors_growth() {
        let mut t = tree();
        t.advance(2.7, 10);
        assert_eq!(t.revealed_levels(), 2);
    }

    #[test]
    fn render_reveals_only_grown_levels() {
        let params = TreeParams {
            recursion_depth: 5,
            ..TreeParams::default()
        };
        let style = BranchStyle::new(&params, Season::Spring);
        let mut t = tree();
        t.advance(2.5, params.recursion_depth);

        let mut tally = Tally::default();
        t.render(&mut tally, &params, &style, 0.0);
        assert_eq!(tally.branches, 1 + 2);
    }

    #[test]
    fn forest_grow_reports_finished_trees() {
        let params = TreeParams {
            growth_speed: 1.0,
            recursion_depth: 5,
            ..TreeParams::default()
        };
        let mut forest = Forest::new();
        forest.plant(tree());
        let mut late = tree();
        late.growth = 4.95;
        forest.plant(late);

        assert_eq!(forest.grow(&params), vec![1]);
        assert!((forest.trees[0].growth - 0.1).abs() < 1e-6);
    }

    #[test]
    fn rescale_trunks_keeps_proportions() {
        let mut forest = Forest::new();
        forest.plant(Tree::new(Vec2::ZERO, 100.0, 1));
        forest.plant(Tree::new(Vec2::ZERO, 50.0, 2));
        forest.rescale_trunks(100.0, 150.0);
        assert_eq!(forest.trees[0].trunk_length, 150.0);
        assert_eq!(forest.trees[1].trunk_length, 75.0);
    }

    #[test]
    fn randomize_seeds_changes_seeds_only() {
        let mut forest = Forest::new();
        forest.plant(tree());
        forest.trees[0].growth = 3.0;
        let mut rng = StdRng::seed_from_u64(9);
        forest.randomize_seeds(&mut rng);
        assert_ne!(forest.trees[0].seed, 42);
        assert_eq!(forest.trees[0].growth, 3.0);
    }

    #[test]
    fn progress_of_empty_forest_is_zero() {
        assert_eq!(Forest::new().progress(10), 0.0);
    }
}
