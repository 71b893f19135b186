//! Albums stored as directories under a root folder.
//!
//! Multi-file operations stop at the first failure and leave whatever was
//! already done in place; callers show the error to the user.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::error::{LibraryError, Result};
use crate::image_loader::{is_album_image, open_image};

/// Target format for [`AlbumFolders::convert_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertFormat {
    Png,
    Jpg,
    Jpeg,
}

impl ConvertFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ConvertFormat::Png => "png",
            ConvertFormat::Jpg => "jpg",
            ConvertFormat::Jpeg => "jpeg",
        }
    }
}

pub struct AlbumFolders {
    root: PathBuf,
}

impl AlbumFolders {
    /// Uses `root` as the album library, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!("Opened album folders at {:?}", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the named album; the name is validated but the
    /// directory may not exist.
    pub fn album_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Names of all album directories, sorted.
    pub fn albums(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    pub fn create_album(&self, name: &str) -> Result<PathBuf> {
        let path = self.album_path(name)?;
        if path.exists() {
            return Err(LibraryError::AlreadyExists(name.to_string()));
        }
        fs::create_dir(&path)?;
        debug!(?path, "Created album folder");
        Ok(path)
    }

    /// Removes the album directory and everything in it. Missing albums are
    /// not an error.
    pub fn delete_album(&self, name: &str) -> Result<()> {
        let path = self.album_path(name)?;
        if path.exists() {
            fs::remove_dir_all(&path)?;
            debug!(?path, "Deleted album folder");
        }
        Ok(())
    }

    pub fn rename_album(&self, old_name: &str, new_name: &str) -> Result<PathBuf> {
        let from = self.existing_album(old_name)?;
        let to = self.album_path(new_name)?;
        if to.exists() {
            return Err(LibraryError::AlreadyExists(new_name.to_string()));
        }
        fs::rename(&from, &to)?;
        debug!(?from, ?to, "Renamed album folder");
        Ok(to)
    }

    /// Picture files directly inside the album, sorted by name.
    pub fn images(&self, name: &str) -> Result<Vec<PathBuf>> {
        let dir = self.existing_album(name)?;
        let mut images = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file() && is_album_image(entry.path()) {
                images.push(entry.into_path());
            }
        }
        Ok(images)
    }

    /// Copies `src` into the album, keeping its file name.
    pub fn add_image(&self, name: &str, src: &Path) -> Result<PathBuf> {
        let dir = self.existing_album(name)?;
        let file_name = src
            .file_name()
            .ok_or_else(|| LibraryError::NotFound(src.display().to_string()))?;
        if !src.is_file() {
            return Err(LibraryError::NotFound(src.display().to_string()));
        }

        let dest = dir.join(file_name);
        if dest.exists() {
            return Err(LibraryError::AlreadyExists(dest.display().to_string()));
        }
        fs::copy(src, &dest)?;
        debug!(?src, ?dest, "Copied image into album");
        Ok(dest)
    }

    /// Copies several files in order. Files copied before a failure stay.
    pub fn add_images(&self, name: &str, sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
        sources
            .iter()
            .map(|src| self.add_image(name, src))
            .collect()
    }

    pub fn remove_image(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(LibraryError::NotFound(path.display().to_string()));
        }
        fs::remove_file(path)?;
        debug!(?path, "Removed image");
        Ok(())
    }

    /// Writes a copy of `path` next to it in another format and returns the
    /// new path. The original file is kept.
    pub fn convert_image(&self, path: &Path, format: ConvertFormat) -> Result<PathBuf> {
        let img = decode(path)?;
        let dest = path.with_extension(format.extension());
        save_image(&img, &dest)?;
        debug!(?path, ?dest, "Converted image");
        Ok(dest)
    }

    /// Rescales the picture in place to fit within `width × height`,
    /// keeping its aspect ratio.
    pub fn resize_image(&self, path: &Path, width: u32, height: u32) -> Result<(u32, u32)> {
        let img = decode(path)?;
        let resized = img.resize(width.max(1), height.max(1), FilterType::Lanczos3);
        save_image(&resized, path)?;
        debug!(?path, width = resized.width(), height = resized.height(), "Resized image");
        Ok((resized.width(), resized.height()))
    }

    /// Writes the album folder into a ZIP archive at `dest`.
    ///
    /// Entries are stored as `<album>/<relative path>`. A `dest` inside the
    /// album folder is left out of the archive.
    pub fn export_zip(&self, name: &str, dest: &Path) -> Result<usize> {
        let dir = fs::canonicalize(self.existing_album(name)?)?;
        let file = File::create(dest)?;
        let dest = fs::canonicalize(dest)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.add_directory(format!("{}/", name), options)?;

        let mut files = 0;
        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() != dest.as_path());
        for entry in walker {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(&dir)
                .map_err(|e| LibraryError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
            let entry_name = zip_entry_name(name, relative);

            if entry.file_type().is_dir() {
                zip.add_directory(format!("{}/", entry_name), options)?;
            } else if entry.file_type().is_file() {
                zip.start_file(entry_name, options)?;
                let mut src = File::open(entry.path())?;
                io::copy(&mut src, &mut zip)?;
                files += 1;
            }
        }

        zip.finish()?;
        info!(album = name, ?dest, files, "Exported album to zip");
        Ok(files)
    }

    fn existing_album(&self, name: &str) -> Result<PathBuf> {
        let path = self.album_path(name)?;
        if !path.is_dir() {
            return Err(LibraryError::NotFound(name.to_string()));
        }
        Ok(path)
    }
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);
    if invalid {
        return Err(LibraryError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn zip_entry_name(album: &str, relative: &Path) -> String {
    let mut name = album.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

fn decode(path: &Path) -> Result<DynamicImage> {
    if !path.is_file() {
        return Err(LibraryError::NotFound(path.display().to_string()));
    }
    open_image(path).map_err(|e| LibraryError::Decode(format!("{:#}", e)))
}

/// Saves by extension; JPEG has no alpha channel so it gets RGB8.
fn save_image(img: &DynamicImage, dest: &Path) -> Result<()> {
    let is_jpeg = dest
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));

    if is_jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8()).save(dest)?;
    } else {
        img.save(dest)?;
    }
    Ok(())
}
