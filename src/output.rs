//! PNG output and chart file naming

use std::io;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Path of a named chart inside the output directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tweetsent::output::chart_path;
///
/// let path = chart_path(Path::new("results/charts"), "Top Hashtags");
/// assert_eq!(path, Path::new("results/charts/top_hashtags.png"));
/// ```
pub fn chart_path(dir: &Path, name: &str) -> PathBuf {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    dir.join(format!("{stem}.png"))
}
