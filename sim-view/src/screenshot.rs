//! Writing captured frames to PNG files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Captured image is empty")]
    EmptyImage,

    #[error("Captured image has {got} pixels, expected {expected}")]
    SizeMismatch { expected: usize, got: usize },
}

/// File name for a screenshot taken at `at`.
pub fn file_name(at: DateTime<Local>) -> String {
    at.format("tree_%Y%m%d_%H%M%S.png").to_string()
}

/// First free path in `dir` for a screenshot taken at `at`.
///
/// Two shots in the same second get `_1`, `_2`, ... suffixes.
fn free_path(dir: &Path, at: DateTime<Local>) -> PathBuf {
    let base = file_name(at);
    let path = dir.join(&base);
    if !path.exists() {
        return path;
    }
    let stem = base.trim_end_matches(".png");
    (1..)
        .map(|n| dir.join(format!("{stem}_{n}.png")))
        .find(|p| !p.exists())
        .unwrap_or(path)
}

/// Saves `image` as a PNG in `dir`, creating the directory if needed.
pub fn save(
    image: &egui::ColorImage,
    dir: &Path,
    at: DateTime<Local>,
) -> Result<PathBuf, ScreenshotError> {
    let [w, h] = image.size;
    if w == 0 || h == 0 {
        return Err(ScreenshotError::EmptyImage);
    }
    if image.pixels.len() != w * h {
        return Err(ScreenshotError::SizeMismatch {
            expected: w * h,
            got: image.pixels.len(),
        });
    }

    let bytes: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| c.to_srgba_unmultiplied())
        .collect();
    let buffer = image::RgbaImage::from_raw(w as u32, h as u32, bytes).ok_or(
        ScreenshotError::SizeMismatch {
            expected: w * h,
            got: image.pixels.len(),
        },
    )?;

    fs::create_dir_all(dir)?;
    let path = free_path(dir, at);
    buffer.save_with_format(&path, image::ImageFormat::Png)?;
    log::info!("saved screenshot {}", path.display());
    Ok(path)
}
