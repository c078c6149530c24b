//! Interactive recursive tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Scene`] and the UI state
//! around it and implements [`eframe::App`] to render and control it.

use std::path::PathBuf;

use eframe::App;
use sim_core::{
    config::{
        ANGLE_DEG_RANGE, ASYMMETRY_RANGE, DEPTH_RANGE, GROWTH_SPEED_RANGE, LENGTH_RATIO_RANGE,
        TRUNK_LENGTH_RANGE, TreeParams, WIND_RANGE,
    },
    scene::{Command, HELP_BOX_MAX, HELP_BOX_MIN, Scene},
    season::Season,
    settings::Settings,
    types::Bounds,
};

use crate::{
    paint::{PainterCanvas, to_scene, to_screen},
    screenshot,
};

/// How long status messages stay visible, seconds.
const STATUS_SECONDS: f64 = 4.0;

/// How long to wait for the backend to deliver a requested screenshot.
const SCREENSHOT_TIMEOUT: f64 = 3.0;

/// Something a key or button asks for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Scene(Command),
    Screenshot,
    TogglePause,
}

const KEY_BINDINGS: &[(egui::Key, Action)] = &[
    (egui::Key::Num1, Action::Scene(Command::SetSeason(Season::Spring))),
    (egui::Key::Num2, Action::Scene(Command::SetSeason(Season::Summer))),
    (egui::Key::Num3, Action::Scene(Command::SetSeason(Season::Autumn))),
    (egui::Key::Num4, Action::Scene(Command::SetSeason(Season::Winter))),
    (egui::Key::Space, Action::Scene(Command::RestartGrowth)),
    (egui::Key::C, Action::Scene(Command::ClearTrees)),
    (egui::Key::R, Action::Scene(Command::RandomizeSeeds)),
    (egui::Key::S, Action::Screenshot),
    (egui::Key::P, Action::TogglePause),
];

/// Action bound to `key`, if any.
pub fn key_action(key: egui::Key) -> Option<Action> {
    KEY_BINDINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, action)| *action)
}

#[derive(Debug, Clone)]
struct Status {
    text: String,
    error: bool,
    expires: f64,
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Scene`] with its trees, season and particles.
/// - `params`, the slider-edited copy of [`TreeParams`], pushed into the
///   scene once per frame before it advances.
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The per-frame update is:
/// 1. Keyboard shortcuts and panel widgets produce [`Action`]s.
/// 2. Changed parameters go to [`Scene::set_params`].
/// 3. The scene advances by the frame time and is painted.
/// 4. A pending screenshot, if delivered this frame, is written to disk.
pub struct Viewer {
    scene: Scene,
    params: TreeParams,

    settings: Settings,
    settings_path: PathBuf,

    paused: bool,
    /// Input time at which an undelivered screenshot was requested.
    screenshot_requested: Option<f64>,
    status: Option<Status>,
}

impl Viewer {
    /// Creates a viewer from loaded settings.
    ///
    /// ### Parameters
    /// - `settings` - Initial parameters, season, screenshot directory.
    /// - `settings_path` - Where "Save settings" writes to.
    pub fn new(settings: Settings, settings_path: PathBuf) -> Self {
        let [w, h] = settings.window_size;
        let mut scene = Scene::new(settings.params, Bounds::new(w, h));
        scene.apply(Command::SetSeason(settings.season));
        let params = *scene.params();

        Self {
            scene,
            params,
            settings,
            settings_path,
            paused: false,
            screenshot_requested: None,
            status: None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, error: bool, now: f64) {
        self.status = Some(Status {
            text: text.into(),
            error,
            expires: now + STATUS_SECONDS,
        });
    }

    /// Carries out one action.
    fn perform(&mut self, action: Action, ctx: &egui::Context) {
        match action {
            Action::Scene(cmd) => {
                self.scene.apply(cmd);
            }
            Action::Screenshot => {
                if self.screenshot_requested.is_none() {
                    self.screenshot_requested = Some(ctx.input(|i| i.time));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(
                        egui::UserData::default(),
                    ));
                }
            }
            Action::TogglePause => self.paused = !self.paused,
        }
    }

    /// Settings reflecting the current state, as "Save settings" writes them.
    fn current_settings(&self) -> Settings {
        Settings {
            params: *self.scene.params(),
            season: self.scene.season(),
            ..self.settings.clone()
        }
    }

    fn save_settings(&mut self, now: f64) {
        let settings = self.current_settings();
        match settings.save(&self.settings_path) {
            Ok(()) => {
                self.settings = settings;
                let msg = format!("Settings saved to {}", self.settings_path.display());
                self.set_status(msg, false, now);
            }
            Err(e) => {
                log::error!("saving settings failed: {e}");
                self.set_status(format!("Saving settings failed: {e}"), true, now);
            }
        }
    }

    /// Collects keyboard shortcuts pressed this frame.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let actions: Vec<Action> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => key_action(*key),
                    _ => None,
                })
                .collect()
        });
        for action in actions {
            self.perform(action, ctx);
        }
    }

    /// Writes a screenshot delivered by the backend this frame.
    ///
    /// A request the backend never answers (e.g. while minimised) is dropped
    /// after [`SCREENSHOT_TIMEOUT`] with an error status.
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        let Some(requested) = self.screenshot_requested else {
            return;
        };
        let now = ctx.input(|i| i.time);
        let image = ctx.input(|i| {
            i.raw.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(image) = image else {
            if now - requested > SCREENSHOT_TIMEOUT {
                self.screenshot_requested = None;
                log::error!("screenshot not delivered after {SCREENSHOT_TIMEOUT}s");
                self.set_status("Screenshot failed: no frame was captured", true, now);
            }
            return;
        };
        self.screenshot_requested = None;

        match screenshot::save(&image, &self.settings.screenshot_dir, chrono::Local::now()) {
            Ok(path) => self.set_status(format!("Saved {}", path.display()), false, now),
            Err(e) => {
                log::error!("screenshot failed: {e}");
                self.set_status(format!("Screenshot failed: {e}"), true, now);
            }
        }
    }

    /// Helper for a slider that edits a fraction but shows a percentage.
    fn percent_slider(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
    ) {
        let mut pct = *value * 100.0;
        let pct_range = range.start() * 100.0..=range.end() * 100.0;
        if ui
            .add(egui::Slider::new(&mut pct, pct_range).text(label).suffix("%").integer())
            .changed()
        {
            *value = pct / 100.0;
        }
    }

    /// Builds the top panel UI (seasons, growth commands, files).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();
        let mut save = false;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (i, season) in Season::ALL.into_iter().enumerate() {
                    let label = format!("{} {}", i + 1, season.name());
                    if ui
                        .selectable_label(self.scene.season() == season, label)
                        .clicked()
                    {
                        actions.push(Action::Scene(Command::SetSeason(season)));
                    }
                }

                ui.separator();
                if ui
                    .button(if self.paused { "▶ Run" } else { "⏸ Pause" })
                    .clicked()
                {
                    actions.push(Action::TogglePause);
                }
                if ui.button("Restart growth").clicked() {
                    actions.push(Action::Scene(Command::RestartGrowth));
                }
                if ui.button("Clear").clicked() {
                    actions.push(Action::Scene(Command::ClearTrees));
                }
                if ui.button("Reseed").clicked() {
                    actions.push(Action::Scene(Command::RandomizeSeeds));
                }

                ui.separator();
                if ui.button("📷 Screenshot").clicked() {
                    actions.push(Action::Screenshot);
                }
                if ui.button("Save settings").clicked() {
                    save = true;
                }
            });
        });

        for action in actions {
            self.perform(action, ctx);
        }
        if save {
            let now = ctx.input(|i| i.time);
            self.save_settings(now);
        }
    }

    /// Builds the bottom status bar (season, trees, growth, particles).
    fn ui_status_bar(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if self.status.as_ref().is_some_and(|s| s.expires < now) {
            self.status = None;
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    let color = if status.error {
                        egui::Color32::LIGHT_RED
                    } else {
                        ui.visuals().text_color()
                    };
                    ui.colored_label(color, status.text.as_str());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let counts = self.scene.particle_counts();
                    let forest = self.scene.forest();
                    ui.label(format!("particles = {}", counts.total()));
                    ui.label(format!(
                        "growth = {:.0}%",
                        forest.progress(self.scene.params().recursion_depth) * 100.0
                    ));
                    ui.label(format!("trees = {}", forest.len()));
                    ui.separator();
                    ui.label(format!("season = {}", self.scene.season()));
                });
            });
        });
    }

    /// Builds the right-hand panel of parameter sliders.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(false)
            .default_width(230.0)
            .show(ctx, |ui| {
                ui.heading("Tree");

                ui.separator();
                let mut degrees = self.params.branch_angle_degrees();
                if ui
                    .add(
                        egui::Slider::new(&mut degrees, ANGLE_DEG_RANGE)
                            .text("Angle")
                            .suffix("°")
                            .integer(),
                    )
                    .changed()
                {
                    self.params.set_branch_angle_degrees(degrees);
                }
                ui.add(egui::Slider::new(&mut self.params.recursion_depth, DEPTH_RANGE).text("Depth"));
                Self::percent_slider(ui, "Length", &mut self.params.length_ratio, LENGTH_RATIO_RANGE);
                ui.add(
                    egui::Slider::new(&mut self.params.trunk_length, TRUNK_LENGTH_RANGE)
                        .text("Trunk")
                        .integer(),
                );
                Self::percent_slider(ui, "Asymmetry", &mut self.params.asymmetry, ASYMMETRY_RANGE);

                ui.separator();
                ui.label("Animation");
                Self::percent_slider(ui, "Growth", &mut self.params.growth_speed, GROWTH_SPEED_RANGE);
                ui.add(
                    egui::Slider::new(&mut self.params.wind, WIND_RANGE)
                        .text("Wind")
                        .integer(),
                );

                ui.separator();
                if ui.button("Reset sliders").clicked() {
                    self.params = TreeParams::default();
                }
            });

        if self.params != *self.scene.params() {
            self.scene.set_params(self.params);
            self.params = *self.scene.params();
        }
    }

    /// Paints the key help box in the corner reserved for it.
    fn paint_help(&self, painter: &egui::Painter, rect: egui::Rect) {
        let min = to_screen(rect.min, HELP_BOX_MIN);
        let max = to_screen(rect.min, HELP_BOX_MAX);
        painter.rect_filled(
            egui::Rect::from_min_max(min, max),
            0.0,
            egui::Color32::from_black_alpha(200),
        );
        let font = egui::FontId::proportional(16.0);
        painter.text(
            min + egui::vec2(10.0, 8.0),
            egui::Align2::LEFT_TOP,
            format!("Season: {} (1-4)", self.scene.season().name().to_uppercase()),
            font.clone(),
            egui::Color32::WHITE,
        );
        painter.text(
            min + egui::vec2(10.0, 32.0),
            egui::Align2::LEFT_TOP,
            "SPACE restart  C clear  R reseed  S shot",
            font,
            egui::Color32::WHITE,
        );
    }

    /// Builds the central canvas: planting, advancing and painting the scene.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::click());
                let rect = response.rect;
                self.scene.resize(Bounds::new(rect.width(), rect.height()));

                // Plant on click.
                if response.clicked()
                    && let Some(p) = response.interact_pointer_pos()
                {
                    let pos = to_scene(rect.min, p);
                    if !self.scene.apply(Command::Plant(pos)) {
                        let now = ctx.input(|i| i.time);
                        self.set_status("Trees can only be planted in open sky", false, now);
                    }
                }

                if !self.paused {
                    let dt = ctx.input(|i| i.stable_dt);
                    self.scene.advance(dt);
                    ctx.request_repaint();
                }

                let painter = ui.painter_at(rect);
                self.scene.render(&mut PainterCanvas::new(&painter, rect.min));
                self.paint_help(&painter, rect);
            });
    }

    /// Builds every panel for one frame.
    fn show(&mut self, ctx: &egui::Context) {
        self.handle_keys(ctx);
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
        self.handle_screenshot(ctx);
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}
