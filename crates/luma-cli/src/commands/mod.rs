//! CLI command implementations.

pub mod convert;
pub mod device;
pub mod info;

use anyhow::{Context, Result};
use luma_core::ImageBuffer;
use std::path::Path;

/// Load an image from a path.
pub fn load_image(path: &Path) -> Result<ImageBuffer> {
    luma_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save an image to a path.
pub fn save_image(path: &Path, image: &ImageBuffer) -> Result<()> {
    luma_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}
