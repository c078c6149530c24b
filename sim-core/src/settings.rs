//! Settings persisted between runs as JSON.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    config::TreeParams,
    error::{Error, Result},
    season::Season,
};

/// Environment variable naming an alternative settings file.
pub const CONFIG_ENV: &str = "TREE_GROWTH_CONFIG";
/// Settings file looked up in the working directory by default.
pub const DEFAULT_FILE: &str = "tree_growth.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub params: TreeParams,
    pub season: Season,
    pub screenshot_dir: PathBuf,
    /// Initial window size in logical pixels.
    pub window_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            params: TreeParams::default(),
            season: Season::default(),
            screenshot_dir: PathBuf::from("screenshots"),
            window_size: [1000.0, 700.0],
        }
    }
}

impl Settings {
    /// Path from [`CONFIG_ENV`] if set, else [`DEFAULT_FILE`].
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE))
    }

    /// Reads settings from `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        let mut settings: Settings = serde_json::from_str(&text)?;
        settings.params = settings.params.validated()?;
        Ok(Some(settings))
    }

    /// Reads settings from `path`, falling back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(Some(settings)) => {
                log::info!("loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::debug!("no settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        log::info!("saved settings to {}", path.display());
        Ok(())
    }
}
