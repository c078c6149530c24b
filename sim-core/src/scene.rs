//! One frame's worth of world: trees, parameters, season and particles.
//!
//! The typical frame looks like:
//! 1. The UI applies [`Command`]s and [`Scene::set_params`].
//! 2. [`Scene::advance`] runs whole fixed-length ticks for the elapsed time;
//!    each [`Scene::tick`] grows trees, spawns and moves particles.
//! 3. [`Scene::render`] emits every primitive for the frame.

use glam::Vec2;
use rand::{Rng, SeedableRng, rng, rngs::StdRng};

use crate::{
    branch::BranchStyle,
    config::TreeParams,
    particles::{Bird, Butterfly, FallingLeaf, ParticleSystem, Snowflake},
    primitive::{Canvas, Primitive},
    scenery::Scenery,
    season::Season,
    tree::{Forest, Tree},
    types::{Bounds, TreeId},
};

/// Length of one simulation tick, seconds.
pub const TICK: f32 = 1.0 / 60.0;
/// Ticks run at most per [`Scene::advance`]; older backlog is dropped.
pub const MAX_TICKS_PER_FRAME: u32 = 5;
/// Height of the ground band at the bottom of the screen.
pub const GROUND_HEIGHT: f32 = 100.0;
/// Corner box reserved for the key help overlay; no planting there.
pub const HELP_BOX_MIN: Vec2 = Vec2::new(10.0, 10.0);
pub const HELP_BOX_MAX: Vec2 = Vec2::new(290.0, 70.0);

const SCENERY_SEED: u64 = 0x5EED;

const LEAF_CAPACITY: usize = 50;
const INITIAL_LEAVES: usize = 20;
const LEAF_SPAWN_CHANCE: f64 = 0.1;
const LEAF_SHED_CHANCE: f64 = 0.005;

const SNOW_CAPACITY: usize = 400;
const SNOW_PER_TICK: usize = 2;
const SNOW_COVER_MAX: f32 = 14.0;
const SNOW_COVER_GROWTH: f32 = 0.02;
const SNOW_COVER_MELT: f32 = 0.05;

const BUTTERFLY_CAPACITY: usize = 6;
const BUTTERFLY_CHANCE: f64 = 0.01;
const BIRD_CAPACITY: usize = 3;
const BIRD_CHANCE: f64 = 0.004;

/// Discrete user actions, from keys, buttons or clicks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    SetSeason(Season),
    RestartGrowth,
    ClearTrees,
    RandomizeSeeds,
    Plant(Vec2),
}

/// Live particle counts, for status display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticleCounts {
    pub leaves: usize,
    pub snow: usize,
    pub butterflies: usize,
    pub birds: usize,
}

impl ParticleCounts {
    pub fn total(&self) -> usize {
        self.leaves + self.snow + self.butterflies + self.birds
    }
}

pub struct Scene {
    params: TreeParams,
    season: Season,
    forest: Forest,

    leaves: ParticleSystem<FallingLeaf>,
    snow: ParticleSystem<Snowflake>,
    butterflies: ParticleSystem<Butterfly>,
    birds: ParticleSystem<Bird>,
    scenery: Scenery,
    snow_cover: f32,

    rng: StdRng,
    bounds: Bounds,
    time: f32,
    accumulator: f32,

    /// Reused buffer for finding leaf tips to shed from.
    tip_scratch: Vec<Primitive>,
}

impl Scene {
    /// Creates a scene with one tree planted at the bottom centre.
    pub fn new(params: TreeParams, bounds: Bounds) -> Self {
        Self::with_rng(params, bounds, StdRng::from_rng(&mut rng()))
    }

    /// Like [`Scene::new`], but fully reproducible.
    pub fn with_seed(params: TreeParams, bounds: Bounds, seed: u64) -> Self {
        Self::with_rng(params, bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: TreeParams, bounds: Bounds, rng: StdRng) -> Self {
        let mut scene = Self {
            params: params.clamped(),
            season: Season::default(),
            forest: Forest::new(),
            leaves: ParticleSystem::with_capacity(LEAF_CAPACITY),
            snow: ParticleSystem::with_capacity(SNOW_CAPACITY),
            butterflies: ParticleSystem::with_capacity(BUTTERFLY_CAPACITY),
            birds: ParticleSystem::with_capacity(BIRD_CAPACITY),
            scenery: Scenery::generate(bounds.width, SCENERY_SEED),
            snow_cover: 0.0,
            rng,
            bounds,
            time: 0.0,
            accumulator: 0.0,
            tip_scratch: Vec::new(),
        };
        let base = Vec2::new(bounds.width * 0.5, scene.ground_y());
        let seed = scene.rng.random();
        scene
            .forest
            .plant(Tree::new(base, scene.params.trunk_length, seed));
        scene
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Simulated seconds since the scene was created.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn snow_cover(&self) -> f32 {
        self.snow_cover
    }

    /// Y coordinate of the top of the ground band.
    pub fn ground_y(&self) -> f32 {
        (self.bounds.height - GROUND_HEIGHT).max(0.0)
    }

    pub fn particle_counts(&self) -> ParticleCounts {
        ParticleCounts {
            leaves: self.leaves.len(),
            snow: self.snow.len(),
            butterflies: self.butterflies.len(),
            birds: self.birds.len(),
        }
    }

    /// Current wind sway in radians, applied in full to the thinnest branches.
    pub fn wind_offset(&self) -> f32 {
        (self.params.wind / 50.0) * (0.05 + 0.03 * (self.time * 1.5).sin())
    }

    /// Replaces the parameters, keeping trees consistent with them.
    ///
    /// Trunks are rescaled when the trunk length moves and growth is
    /// re-capped when the depth limit moves.
    pub fn set_params(&mut self, params: TreeParams) {
        let params = params.clamped();
        if params.trunk_length != self.params.trunk_length {
            self.forest
                .rescale_trunks(self.params.trunk_length, params.trunk_length);
        }
        if params.recursion_depth != self.params.recursion_depth {
            self.forest.sync_depth(params.recursion_depth);
        }
        self.params = params;
    }

    /// Adapts to a new viewport size.
    ///
    /// Trees keep their relative horizontal position and stay rooted at the
    /// same distance from the ground line. An empty viewport (a minimised
    /// window) is ignored so positions survive it.
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds == self.bounds || bounds.width <= 0.0 || bounds.height <= 0.0 {
            return;
        }
        let old_ground = self.ground_y();
        let sx = if self.bounds.width > 0.0 {
            bounds.width / self.bounds.width
        } else {
            1.0
        };
        self.bounds = bounds;
        let dy = self.ground_y() - old_ground;
        for t in &mut self.forest.trees {
            t.pos.x *= sx;
            t.pos.y += dy;
        }
        if (self.scenery.width() - bounds.width).abs() >= 1.0 {
            self.scenery = Scenery::generate(bounds.width, SCENERY_SEED);
        }
    }

    /// Whether a click at `pos` may plant a tree.
    pub fn can_plant(&self, pos: Vec2) -> bool {
        let in_help_box = pos.x >= HELP_BOX_MIN.x
            && pos.x <= HELP_BOX_MAX.x
            && pos.y >= HELP_BOX_MIN.y
            && pos.y <= HELP_BOX_MAX.y;
        self.bounds.contains(pos) && pos.y < self.ground_y() && !in_help_box
    }

    /// Applies a user command. Returns `false` if it had no effect.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::SetSeason(season) => {
                if season == self.season {
                    return false;
                }
                self.change_season(season);
                true
            }
            Command::RestartGrowth => {
                self.forest.restart_growth();
                if self.season == Season::Autumn {
                    self.spawn_initial_leaves();
                }
                log::info!("restarted growth of {} trees", self.forest.len());
                true
            }
            Command::ClearTrees => {
                let had = self.forest.len();
                self.forest.clear();
                log::info!("cleared {had} trees");
                had > 0
            }
            Command::RandomizeSeeds => {
                self.forest.randomize_seeds(&mut self.rng);
                log::info!("new seeds for {} trees", self.forest.len());
                !self.forest.is_empty()
            }
            Command::Plant(pos) => self.plant(pos).is_some(),
        }
    }

    /// Plants a tree at `pos` if allowed.
    pub fn plant(&mut self, pos: Vec2) -> Option<TreeId> {
        if !self.can_plant(pos) {
            log::debug!("refused to plant at ({:.0}, {:.0})", pos.x, pos.y);
            return None;
        }
        let seed = self.rng.random();
        let id = self
            .forest
            .plant(Tree::new(pos, self.params.trunk_length, seed));
        log::info!("planted tree {id} at ({:.0}, {:.0})", pos.x, pos.y);
        Some(id)
    }

    fn change_season(&mut self, season: Season) {
        log::info!("season {} -> {}", self.season, season);
        self.season = season;

        self.leaves.clear();
        if season == Season::Autumn {
            self.spawn_initial_leaves();
        }
        if season != Season::Winter {
            self.snow.clear();
        }
        if !season.has_butterflies() {
            self.butterflies.clear();
        }
        if !season.has_birds() {
            self.birds.clear();
        }
    }

    fn spawn_initial_leaves(&mut self) {
        self.leaves.clear();
        let cx = self.bounds.width * 0.5;
        let low = self.bounds.height * 0.15;
        let high = (self.ground_y() * 0.85).max(low + 1.0);
        for _ in 0..INITIAL_LEAVES {
            let pos = Vec2::new(
                self.rng.random_range(cx - 200.0..=cx + 200.0),
                self.rng.random_range(low..=high),
            );
            self.spawn_leaf(pos);
        }
    }

    fn spawn_leaf(&mut self, pos: Vec2) -> bool {
        let palette = Season::falling_palette();
        let color = palette[self.rng.random_range(0..palette.len())];
        let leaf = FallingLeaf::new(pos, color, &mut self.rng);
        self.leaves.spawn(leaf)
    }

    /// Runs as many whole ticks as `dt` seconds cover.
    ///
    /// Leftover time carries into the next call. Returns the number of
    /// ticks run.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= TICK && ticks < MAX_TICKS_PER_FRAME {
            self.tick();
            self.accumulator -= TICK;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = self.accumulator.min(TICK);
        }
        ticks
    }

    /// One fixed simulation step.
    pub fn tick(&mut self) {
        self.time += TICK;

        for id in self.forest.grow(&self.params) {
            log::debug!("tree {id} fully grown");
        }

        self.spawn_particles();

        let wind = self.params.wind;
        let bounds = self.bounds;
        self.leaves.update(wind, &bounds, &mut self.rng);
        self.snow.update(wind, &bounds, &mut self.rng);
        self.butterflies.update(wind, &bounds, &mut self.rng);
        self.birds.update(wind, &bounds, &mut self.rng);

        self.snow_cover = if self.season == Season::Winter {
            (self.snow_cover + SNOW_COVER_GROWTH).min(SNOW_COVER_MAX)
        } else {
            (self.snow_cover - SNOW_COVER_MELT).max(0.0)
        };
    }

    fn spawn_particles(&mut self) {
        match self.season {
            Season::Autumn => {
                if !self.forest.is_empty()
                    && !self.leaves.is_full()
                    && self.rng.random_bool(LEAF_SPAWN_CHANCE)
                {
                    let idx = self.rng.random_range(0..self.forest.len());
                    let tree = &self.forest.trees[idx];
                    let (base, trunk) = (tree.pos, tree.trunk_length);
                    let pos = Vec2::new(
                        base.x + self.rng.random_range(-150.0..=150.0),
                        base.y - trunk * self.rng.random_range(1.25..=2.9),
                    );
                    self.spawn_leaf(pos);
                }
                self.shed_leaves();
            }
            Season::Winter => {
                for _ in 0..SNOW_PER_TICK {
                    let flake = Snowflake::spawn_at_top(&self.bounds, &mut self.rng);
                    if !self.snow.spawn(flake) {
                        break;
                    }
                }
            }
            Season::Spring | Season::Summer => {}
        }

        if self.season.has_butterflies()
            && !self.butterflies.is_full()
            && self.rng.random_bool(BUTTERFLY_CHANCE)
        {
            let ground = self.ground_y();
            let pos = Vec2::new(
                self.rng.random_range(0.0..=self.bounds.width.max(1.0)),
                self.rng.random_range(ground * 0.4..=ground * 0.9 + 1.0),
            );
            let b = Butterfly::new(pos, &mut self.rng);
            self.butterflies.spawn(b);
        }

        if self.season.has_birds() && !self.birds.is_full() && self.rng.random_bool(BIRD_CHANCE) {
            let b = Bird::enter(&self.bounds, &mut self.rng);
            self.birds.spawn(b);
        }
    }

    /// Lets a few visible leaves come loose from their tips.
    fn shed_leaves(&mut self) {
        if self.leaves.is_full() {
            return;
        }
        let mut tips = std::mem::take(&mut self.tip_scratch);
        tips.clear();
        self.render_trees(&mut tips);
        for p in &tips {
            if let Primitive::Leaf(blob) = p
                && self.rng.random_bool(LEAF_SHED_CHANCE)
                && !self.spawn_leaf(blob.center)
            {
                break;
            }
        }
        self.tip_scratch = tips;
    }

    fn render_trees<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let style = BranchStyle::new(&self.params, self.season);
        let offset = self.wind_offset();
        for t in &self.forest.trees {
            t.render(canvas, &self.params, &style, offset);
        }
    }

    /// Emits the whole frame, back to front.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let w = self.bounds.width;
        let h = self.bounds.height;
        let ground = self.ground_y();

        canvas.emit(Primitive::Rect {
            min: Vec2::ZERO,
            max: Vec2::new(w, h),
            color: self.season.sky(),
        });
        canvas.emit(Primitive::Rect {
            min: Vec2::new(0.0, ground),
            max: Vec2::new(w, h),
            color: self.season.ground(),
        });
        if self.snow_cover > 0.0 {
            canvas.emit(Primitive::Rect {
                min: Vec2::new(0.0, ground),
                max: Vec2::new(w, (ground + self.snow_cover).min(h)),
                color: crate::types::Rgb::WHITE,
            });
        }

        self.scenery
            .render(canvas, ground, self.time, self.params.wind, self.season);
        self.render_trees(canvas);

        self.leaves.render(canvas);
        self.snow.render(canvas);
        self.butterflies.render(canvas);
        self.birds.render(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Tally;

    fn scene() -> Scene {
        Scene::with_seed(TreeParams::default(), Bounds::new(1000.0, 700.0), 7)
    }

    fn run_ticks(s: &mut Scene, n: usize) {
        for _ in 0..n {
            s.tick();
        }
    }

    #[test]
    fn starts_with_one_tree_at_bottom_centre() {
        let s = scene();
        assert_eq!(s.forest().len(), 1);
        assert_eq!(s.forest().trees[0].pos, Vec2::new(500.0, 600.0));
        assert_eq!(s.forest().trees[0].growth, 0.0);
    }

    #[test]
    fn can_plant_only_in_open_sky() {
        let s = scene();
        assert!(s.can_plant(Vec2::new(500.0, 400.0)));
        assert!(!s.can_plant(Vec2::new(500.0, 650.0)), "ground");
        assert!(!s.can_plant(Vec2::new(100.0, 40.0)), "help box");
        assert!(!s.can_plant(Vec2::new(-5.0, 300.0)), "outside");
        assert!(!s.can_plant(Vec2::new(500.0, 800.0)), "below");
    }

    #[test]
    fn plant_command_adds_trees_where_allowed() {
        let mut s = scene();
        assert!(s.apply(Command::Plant(Vec2::new(300.0, 500.0))));
        assert!(!s.apply(Command::Plant(Vec2::new(300.0, 690.0))));
        assert_eq!(s.forest().len(), 2);
        let planted = &s.forest().trees[1];
        assert_eq!(planted.pos, Vec2::new(300.0, 500.0));
        assert_eq!(planted.trunk_length, s.params().trunk_length);
    }

    #[test]
    fn clear_then_plant() {
        let mut s = scene();
        assert!(s.apply(Command::ClearTrees));
        assert!(s.forest().is_empty());
        assert!(!s.apply(Command::ClearTrees));
        s.plant(Vec2::new(200.0, 300.0));
        assert_eq!(s.forest().len(), 1);
    }

    #[test]
    fn advance_runs_whole_ticks_and_carries_the_rest() {
        let mut s = scene();
        assert_eq!(s.advance(TICK * 0.5), 0);
        assert_eq!(s.advance(TICK * 0.6), 1);
        assert_eq!(s.advance(TICK * 2.5), 2);
    }

    #[test]
    fn advance_caps_catch_up() {
        let mut s = scene();
        assert_eq!(s.advance(10.0), MAX_TICKS_PER_FRAME);
        assert!(s.advance(0.0) <= 1);
    }

    #[test]
    fn trees_grow_to_depth_and_stop() {
        let mut s = scene();
        let depth = s.params().recursion_depth as f32;
        let mut last = 0.0;
        for _ in 0..1000 {
            s.tick();
            let g = s.forest().trees[0].growth;
            assert!(g >= last && g <= depth);
            last = g;
        }
        assert_eq!(last, depth);
        assert!(s.forest().trees[0].is_fully_grown());
    }

    #[test]
    fn restart_resets_all_trees() {
        let mut s = scene();
        run_ticks(&mut s, 50);
        assert!(s.forest().trees[0].growth > 0.0);
        s.apply(Command::RestartGrowth);
        assert_eq!(s.forest().trees[0].growth, 0.0);
    }

    #[test]
    fn autumn_prespawns_and_other_seasons_clear_leaves() {
        let mut s = scene();
        assert!(s.apply(Command::SetSeason(Season::Autumn)));
        assert_eq!(s.particle_counts().leaves, INITIAL_LEAVES);
        assert!(!s.apply(Command::SetSeason(Season::Autumn)));

        s.apply(Command::SetSeason(Season::Spring));
        assert_eq!(s.particle_counts().leaves, 0);
    }

    #[test]
    fn autumn_leaf_count_stays_capped() {
        let mut s = scene();
        s.set_params(TreeParams {
            growth_speed: 1.0,
            ..TreeParams::default()
        });
        s.apply(Command::SetSeason(Season::Autumn));
        for _ in 0..600 {
            s.tick();
            assert!(s.particle_counts().leaves <= LEAF_CAPACITY);
        }
    }

    #[test]
    fn winter_snows_and_covers_the_ground() {
        let mut s = scene();
        s.apply(Command::SetSeason(Season::Winter));
        run_ticks(&mut s, 120);
        assert!(s.particle_counts().snow > 0);
        assert!(s.snow_cover() > 0.0);

        s.apply(Command::SetSeason(Season::Summer));
        assert_eq!(s.particle_counts().snow, 0);
        run_ticks(&mut s, 1000);
        assert_eq!(s.snow_cover(), 0.0);
    }

    #[test]
    fn winter_has_no_butterflies_or_birds() {
        let mut s = scene();
        s.apply(Command::SetSeason(Season::Winter));
        run_ticks(&mut s, 2000);
        let c = s.particle_counts();
        assert_eq!(c.butterflies, 0);
        assert_eq!(c.birds, 0);
    }

    #[test]
    fn lowering_depth_caps_grown_trees() {
        let mut s = scene();
        run_ticks(&mut s, 1000);
        s.set_params(TreeParams {
            recursion_depth: 6,
            ..*s.params()
        });
        assert_eq!(s.forest().trees[0].growth, 6.0);
    }

    #[test]
    fn trunk_setting_rescales_existing_trees() {
        let mut s = scene();
        s.set_params(TreeParams {
            trunk_length: 180.0,
            ..*s.params()
        });
        assert!((s.forest().trees[0].trunk_length - 180.0).abs() < 1e-3);
    }

    #[test]
    fn set_params_clamps() {
        let mut s = scene();
        s.set_params(TreeParams {
            wind: 500.0,
            ..TreeParams::default()
        });
        assert_eq!(s.params().wind, 50.0);
    }

    #[test]
    fn resize_keeps_trees_on_the_ground() {
        let mut s = scene();
        s.resize(Bounds::new(2000.0, 900.0));
        assert_eq!(s.forest().trees[0].pos, Vec2::new(1000.0, 800.0));
        assert_eq!(s.ground_y(), 800.0);
    }

    #[test]
    fn empty_viewport_keeps_tree_positions() {
        let mut s = scene();
        s.plant(Vec2::new(300.0, 400.0)).unwrap();
        let before: Vec<Vec2> = s.forest().trees.iter().map(|t| t.pos).collect();

        s.resize(Bounds::new(0.0, 0.0));
        assert_eq!(s.bounds(), Bounds::new(1000.0, 700.0));
        s.resize(Bounds::new(0.0, 700.0));
        s.resize(Bounds::new(1000.0, 700.0));

        let after: Vec<Vec2> = s.forest().trees.iter().map(|t| t.pos).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn no_wind_means_no_sway() {
        let mut s = scene();
        run_ticks(&mut s, 30);
        assert_eq!(s.wind_offset(), 0.0);
        s.set_params(TreeParams {
            wind: 50.0,
            ..*s.params()
        });
        assert!(s.wind_offset() > 0.0);
    }

    #[test]
    fn render_draws_sky_first_and_the_tree() {
        let mut s = scene();
        run_ticks(&mut s, 100);
        let mut out = Vec::new();
        s.render(&mut out);
        assert!(matches!(out[0], Primitive::Rect { .. }));
        assert!(matches!(out[1], Primitive::Rect { .. }));

        let mut tally = Tally::default();
        s.render(&mut tally);
        let revealed = s.forest().trees[0].revealed_levels();
        assert_eq!(tally.branches, (1usize << revealed) - 1);
    }

    #[test]
    fn same_seed_same_frames() {
        let mut a = scene();
        let mut b = scene();
        a.apply(Command::SetSeason(Season::Autumn));
        b.apply(Command::SetSeason(Season::Autumn));
        run_ticks(&mut a, 200);
        run_ticks(&mut b, 200);
        let (mut fa, mut fb) = (Vec::new(), Vec::new());
        a.render(&mut fa);
        b.render(&mut fb);
        assert_eq!(fa, fb);
    }
}
