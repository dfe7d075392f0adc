use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::error::AppError;

/// Decode the compressed copy and scale it to `height`, keeping aspect ratio.
pub(crate) fn scaled_preview(bytes: &[u8], height: u32) -> Result<DynamicImage, AppError> {
    let image = image::load_from_memory(bytes)?;
    debug!(width = image.width(), height = image.height(), "preview decoded");
    Ok(image.resize(u32::MAX, height, FilterType::Triangle))
}

/// Write the scaled preview; the format follows the file extension.
/// Returns the written dimensions.
pub(crate) fn write_preview(bytes: &[u8], height: u32, path: &Path) -> Result<(u32, u32), AppError> {
    let preview = scaled_preview(bytes, height)?;
    preview.to_rgb8().save(path)?;
    Ok((preview.width(), preview.height()))
}
