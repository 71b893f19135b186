use std::path::{Path, PathBuf};

use super::album::UNSAVED_ID;

const FILE_SCHEME: &str = "file://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub id: i64,
    pub album_id: i64,
    /// Local path or `file://` URL, stored verbatim in the `url` column.
    pub file_url: String,
}

impl Picture {
    /// Create an unsaved picture that does not belong to any album yet.
    pub fn new(file_url: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            album_id: UNSAVED_ID,
            file_url: file_url.into(),
        }
    }

    /// Create an unsaved picture pointing at a local file.
    ///
    /// The `url` column is text, so paths that are not valid UTF-8 give
    /// `None` instead of a lossy URL that would point elsewhere.
    pub fn from_path(path: &Path) -> Option<Self> {
        let path = path.to_str()?;
        Some(Self::new(format!("{}{}", FILE_SCHEME, path)))
    }

    /// Same as [`Picture::from_path`] but already assigned to `album_id`.
    pub fn in_album(album_id: i64, path: &Path) -> Option<Self> {
        Some(Self {
            album_id,
            ..Self::from_path(path)?
        })
    }

    /// Filesystem path behind the URL.
    pub fn local_path(&self) -> PathBuf {
        url_to_local_path(&self.file_url)
    }
}

/// Strips a `file://` scheme; plain paths pass through untouched.
pub fn url_to_local_path(url: &str) -> PathBuf {
    PathBuf::from(url.strip_prefix(FILE_SCHEME).unwrap_or(url))
}
