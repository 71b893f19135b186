use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageReader};

/// Extensions the album folders treat as pictures.
pub const ALBUM_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Decodes a picture, sniffing the format from its header rather than its
/// name. A file whose header matches no enabled codec is an error.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let file = File::open(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .context("Failed to guess image format")?;

    let Some(format) = reader.format() else {
        return Err(anyhow!("Unrecognized image format: {:?}", path));
    };
    reader
        .decode()
        .with_context(|| format!("Failed to decode {:?} image: {:?}", format, path))
}

/// True if the file name carries one of [`ALBUM_IMAGE_EXTENSIONS`].
pub fn is_album_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .map_or(false, |e| ALBUM_IMAGE_EXTENSIONS.contains(&e.as_str()))
}
