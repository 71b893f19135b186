//! Thumbnail pipeline for the picture list.
//!
//! This module provides:
//! - `ThumbnailGenerator` - Decodes a picture and scales it into a bounding square
//! - `ThumbnailCache` - LRU map from picture URL to decoded thumbnail
//! - `ThumbnailProxy` - Keeps the cache in sync with a `PictureModel`

pub mod cache;
pub mod generator;
pub mod proxy;

pub use cache::{ProxyState, Thumbnail, ThumbnailCache};
pub use generator::ThumbnailGenerator;
pub use proxy::ThumbnailProxy;
