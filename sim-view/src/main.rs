//! Application entry point for the recursive tree growth viewer.
//!
//! This binary sets up logging, loads settings and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod logging;
mod paint;
mod screenshot;
mod viewer;

use sim_core::settings::Settings;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Settings come from the file named by `TREE_GROWTH_CONFIG`, or
/// `tree_growth.json` in the working directory, or built-in defaults.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    logging::init();

    let settings_path = Settings::default_path();
    let settings = Settings::load_or_default(&settings_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Recursive Tree Growth Simulator")
            .with_inner_size(settings.window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Recursive Tree Growth Simulator",
        options,
        Box::new(move |_cc| {
            // Construct the root app state for the viewer.
            Ok(Box::new(Viewer::new(settings, settings_path)))
        }),
    )
}
