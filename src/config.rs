//! Runtime configuration for the gallery.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::warn;

/// Default maximum edge of a thumbnail, in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 350;

/// Default number of thumbnails kept in memory.
pub const DEFAULT_THUMBNAIL_CACHE_CAPACITY: usize = 2048;

const DB_FILE_NAME: &str = "gallery.sqlite";

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// SQLite database holding albums and pictures.
    pub database_path: PathBuf,
    /// Thumbnails fit within a square of this edge.
    pub thumbnail_size: u32,
    /// Maximum number of decoded thumbnails held in memory.
    pub thumbnail_cache_capacity: usize,
    /// Root directory of the folder-backed album library, if any.
    pub library_root: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        let database_path = Self::default_database_path().unwrap_or_else(|e| {
            warn!(error = ?e, "Falling back to a database in the working directory");
            PathBuf::from(DB_FILE_NAME)
        });

        Self {
            database_path,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            thumbnail_cache_capacity: DEFAULT_THUMBNAIL_CACHE_CAPACITY,
            library_root: None,
        }
    }
}

impl GalleryConfig {
    /// Configuration with the database at `database_path` and defaults elsewhere.
    pub fn with_database(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            thumbnail_cache_capacity: DEFAULT_THUMBNAIL_CACHE_CAPACITY,
            library_root: None,
        }
    }

    /// Returns the default database path based on XDG directories.
    pub fn default_database_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "gallery")
            .context("Failed to determine project directories")?;
        Ok(proj_dirs.config_dir().join(DB_FILE_NAME))
    }

    /// Defaults overridden by `GALLERY_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("GALLERY_DB_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("GALLERY_THUMBNAIL_SIZE") {
            match raw.parse::<u32>() {
                Ok(size) if size > 0 => self.thumbnail_size = size,
                _ => warn!(value = %raw, "Ignoring invalid GALLERY_THUMBNAIL_SIZE"),
            }
        }
        if let Some(raw) = lookup("GALLERY_THUMBNAIL_CACHE") {
            match raw.parse::<usize>() {
                Ok(capacity) if capacity > 0 => self.thumbnail_cache_capacity = capacity,
                _ => warn!(value = %raw, "Ignoring invalid GALLERY_THUMBNAIL_CACHE"),
            }
        }
        if let Some(root) = lookup("GALLERY_LIBRARY_ROOT") {
            self.library_root = Some(PathBuf::from(root));
        }
        self
    }
}
