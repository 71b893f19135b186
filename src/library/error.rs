use thiserror::Error;

/// Errors reported by album folder operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid album name: {0:?}")]
    InvalidName(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Zip export error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
