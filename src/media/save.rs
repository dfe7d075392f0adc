use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use tracing::info;

use crate::consts::SAVE_SUBDIR;
use crate::error::AppError;

const JPEG_QUALITY: u8 = 100;
const SAVE_DPI: u16 = 300;

/// `<pictures>/APOD`, falling back to `~/Pictures/APOD`
pub(crate) fn default_save_dir() -> Option<PathBuf> {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .map(|dir| dir.join(SAVE_SUBDIR))
}

/// Title turned into a file stem: colons and other characters that are not
/// allowed in file names are dropped.
pub(crate) fn sanitize_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, ':' | '<' | '>' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .filter(|c| !c.is_control())
        .collect();
    cleaned.trim().trim_matches('.').trim().to_string()
}

/// Re-encode `bytes` as a quality-100, 300 DPI JPEG named after `title`.
///
/// `fallback_stem` is used when nothing of the title survives sanitizing.
pub(crate) fn save_jpeg(
    bytes: &[u8],
    title: &str,
    fallback_stem: &str,
    dir: &Path,
) -> Result<PathBuf, AppError> {
    let image = image::load_from_memory(bytes)?.to_rgb8();

    let mut stem = sanitize_file_name(title);
    if stem.is_empty() {
        stem = fallback_stem.to_string();
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.jpg"));
    let mut writer = BufWriter::new(File::create(&path)?);

    {
        let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
        encoder.set_pixel_density(PixelDensity::dpi(SAVE_DPI));
        encoder.encode_image(&image)?;
    }
    writer.flush()?;

    info!(path = %path.display(), width = image.width(), height = image.height(), "image saved");
    Ok(path)
}
