//! Core 2-D recursive tree growth and seasonal scene library.
//!
//! Main components:
//! - [`branch`]: the recursive branch generator.
//! - [`tree`]: planted trees and the growth scheduler.
//! - [`config`]: tunable parameters and their ranges.
//! - [`season`]: seasons, palettes and what each one spawns.
//! - [`particles`]: falling leaves, snow, butterflies and birds.
//! - [`scenery`]: swaying grass and flowers.
//! - [`scene`]: ties everything into a fixed-tick, renderable frame.
//! - [`primitive`]: what gets emitted for drawing.
//! - [`rng`]: hash-keyed random streams.
//! - [`settings`] / [`error`]: persisted settings and their errors.
//! - [`types`]: shared small types and IDs.

pub mod branch;
pub mod config;
pub mod error;
pub mod particles;
pub mod primitive;
pub mod rng;
pub mod scene;
pub mod scenery;
pub mod season;
pub mod settings;
pub mod tree;
pub mod types;
