//! Read-through thumbnail layer on top of a `PictureModel`.
//!
//! The proxy does not change rows or indices; it only adds a thumbnail per
//! row. Its cache is subscribed to the source model so structural changes
//! there invalidate thumbnails here.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::cache::{ProxyState, Thumbnail, ThumbnailCache};
use super::generator::ThumbnailGenerator;
use crate::config::GalleryConfig;
use crate::models::{Picture, SharedObserver, SharedPictureModel};

pub struct ThumbnailProxy {
    source: Option<SharedPictureModel>,
    cache: Arc<Mutex<ThumbnailCache>>,
}

impl ThumbnailProxy {
    pub fn new(config: &GalleryConfig) -> Self {
        Self::with_generator(
            ThumbnailGenerator::new(config.thumbnail_size),
            config.thumbnail_cache_capacity,
        )
    }

    pub fn with_generator(generator: ThumbnailGenerator, capacity: usize) -> Self {
        Self {
            source: None,
            cache: Arc::new(Mutex::new(ThumbnailCache::new(generator, capacity))),
        }
    }

    /// Attaches to `source` and decodes every row it currently holds.
    pub fn set_source(&mut self, source: SharedPictureModel) {
        self.detach();

        {
            let mut model = source.lock();
            model.subscribe(self.observer());
            self.cache.lock().reload(model.pictures());
        }

        debug!("Thumbnail proxy attached to picture model");
        self.source = Some(source);
    }

    /// Detaches from the current source and drops every thumbnail.
    pub fn clear_source(&mut self) {
        self.detach();
        self.cache.lock().clear();
    }

    fn detach(&mut self) {
        if let Some(previous) = self.source.take() {
            previous.lock().unsubscribe(&self.observer());
        }
    }

    fn observer(&self) -> SharedObserver<Picture> {
        self.cache.clone()
    }

    pub fn state(&self) -> ProxyState {
        self.cache.lock().state()
    }

    /// Thumbnail for a picture URL or path; decoded and cached on a miss.
    ///
    /// Never fails: an unreadable picture yields a null thumbnail.
    pub fn thumbnail_for(&self, url: &str) -> Arc<Thumbnail> {
        self.cache.lock().get_or_generate(url)
    }

    /// Thumbnail for the source row, or `None` if the row does not exist.
    pub fn thumbnail_at(&self, row: usize) -> Option<Arc<Thumbnail>> {
        let url = self.source.as_ref()?.lock().file_url(row)?.to_string();
        Some(self.thumbnail_for(&url))
    }

    /// Number of rows in the source model.
    pub fn row_count(&self) -> usize {
        self.source.as_ref().map_or(0, |s| s.lock().len())
    }

    /// Number of thumbnails currently held in memory.
    pub fn cached_count(&self) -> usize {
        self.cache.lock().len()
    }
}
