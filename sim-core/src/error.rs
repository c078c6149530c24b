//! Error types for the simulation core.
//!
//! Geometry and simulation never fail; only loading and saving state does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings format error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter {name}: {value}")]
    InvalidParam { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, Error>;
