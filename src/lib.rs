//! Data layer for a desktop photo gallery.
//!
//! Albums and pictures live in a small SQLite store; list models keep an
//! ordered in-memory copy and notify observers when rows change. The
//! thumbnail proxy sits on top of the picture model and keeps a scaled
//! bitmap per picture path. Album folders on disk are handled separately by
//! [`library::AlbumFolders`].

pub mod config;
pub mod gallery;
pub mod image_loader;
pub mod library;
pub mod models;
pub mod thumbnails;

pub use config::GalleryConfig;
pub use gallery::Gallery;
pub use library::{AlbumFolders, LibraryError};
pub use models::{
    Album, AlbumModel, GalleryStore, ModelEvent, ModelObserver, Picture, PictureModel,
    SharedStore,
};
pub use thumbnails::{ProxyState, Thumbnail, ThumbnailProxy};

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber used by the desktop shell.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at info.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gallery=info"));

    // A second call (tests, embedding apps) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
