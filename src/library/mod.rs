//! Folder-backed album library.
//!
//! An album here is a directory under a root folder and its pictures are the
//! image files inside it. This is independent of the SQLite-backed models.

pub mod error;
pub mod folders;

pub use error::LibraryError;
pub use folders::{AlbumFolders, ConvertFormat};
