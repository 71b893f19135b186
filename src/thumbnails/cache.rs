//! In-memory thumbnail cache keyed by local file path.
//!
//! Lookups accept either a plain path or a `file://` URL; both resolve to the
//! same entry.
//!
//! The cache follows the picture model it observes:
//! - `Reset` / `DataChanged`: drop everything and decode every row again
//! - `RowsInserted`: decode only the new rows
//! - `RowsRemoved`: evict URLs that no longer appear in the model
//!
//! A picture that cannot be decoded is cached as a null thumbnail so the
//! row renders blank instead of being retried on every paint.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use lru::LruCache;
use tracing::{debug, trace};

use super::generator::ThumbnailGenerator;
use crate::models::{url_to_local_path, ModelEvent, ModelObserver, Picture};

/// Scaled bitmap for one picture, or nothing if the file could not be decoded.
#[derive(Debug, Clone, Default)]
pub struct Thumbnail {
    image: Option<RgbaImage>,
}

impl Thumbnail {
    pub fn new(image: RgbaImage) -> Self {
        Self { image: Some(image) }
    }

    pub fn null() -> Self {
        Self { image: None }
    }

    pub fn is_null(&self) -> bool {
        self.image.is_none()
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.image.as_ref().map_or(0, |i| i.width())
    }

    pub fn height(&self) -> u32 {
        self.image.as_ref().map_or(0, |i| i.height())
    }
}

/// Lifecycle of the thumbnail set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyState {
    /// No source model attached.
    Empty,
    /// Rows are being decoded after a structural change.
    Populating,
    /// Every row of the source has a cached thumbnail.
    Ready,
}

pub struct ThumbnailCache {
    generator: ThumbnailGenerator,
    entries: LruCache<PathBuf, Arc<Thumbnail>>,
    state: ProxyState,
}

impl ThumbnailCache {
    pub fn new(generator: ThumbnailGenerator, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            generator,
            entries: LruCache::new(capacity),
            state: ProxyState::Empty,
        }
    }

    pub fn state(&self) -> ProxyState {
        self.state
    }

    /// Returns the cached thumbnail for `url`, decoding it on a miss.
    pub fn get_or_generate(&mut self, url: &str) -> Arc<Thumbnail> {
        let path = url_to_local_path(url);
        if let Some(cached) = self.entries.get(&path) {
            trace!(?path, "Thumbnail cache hit");
            return Arc::clone(cached);
        }
        self.generate(path)
    }

    /// Cached thumbnail for `url` without decoding or touching LRU order.
    pub fn peek(&self, url: &str) -> Option<Arc<Thumbnail>> {
        self.entries.peek(&url_to_local_path(url)).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(&url_to_local_path(url))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every thumbnail and decodes `rows` from scratch.
    pub fn reload(&mut self, rows: &[Picture]) {
        self.entries.clear();
        self.state = ProxyState::Populating;
        for picture in rows {
            self.generate(picture.local_path());
        }
        self.state = ProxyState::Ready;
        debug!(count = self.entries.len(), "Thumbnails reloaded");
    }

    /// Decodes the given rows, keeping everything already cached.
    pub fn extend(&mut self, rows: &[Picture]) {
        self.state = ProxyState::Populating;
        for picture in rows {
            self.generate(picture.local_path());
        }
        self.state = ProxyState::Ready;
    }

    /// Evicts every URL that is not among `rows`.
    pub fn retain(&mut self, rows: &[Picture]) {
        let live: HashSet<PathBuf> = rows.iter().map(Picture::local_path).collect();
        let stale: Vec<PathBuf> = self
            .entries
            .iter()
            .filter(|(path, _)| !live.contains(*path))
            .map(|(path, _)| path.clone())
            .collect();
        for path in &stale {
            self.entries.pop(path);
        }
        if !stale.is_empty() {
            debug!(evicted = stale.len(), "Evicted thumbnails of removed pictures");
        }
    }

    /// Forgets every thumbnail and detaches from the source.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.state = ProxyState::Empty;
    }

    fn generate(&mut self, path: PathBuf) -> Arc<Thumbnail> {
        let thumbnail = Arc::new(render_or_null(&self.generator, &path));
        self.entries.put(path, Arc::clone(&thumbnail));
        thumbnail
    }
}

fn render_or_null(generator: &ThumbnailGenerator, path: &Path) -> Thumbnail {
    match generator.render(path) {
        Ok(image) => Thumbnail::new(image),
        Err(e) => {
            debug!(?path, error = %e, "Thumbnail decode failed, using null thumbnail");
            Thumbnail::null()
        }
    }
}

impl ModelObserver<Picture> for ThumbnailCache {
    fn model_changed(&mut self, event: &ModelEvent, rows: &[Picture]) {
        trace!(?event, rows = rows.len(), "Thumbnail cache notified");
        match *event {
            ModelEvent::Reset | ModelEvent::DataChanged { .. } => self.reload(rows),
            ModelEvent::RowsInserted { first, last } => {
                let end = (last + 1).min(rows.len());
                let start = first.min(end);
                self.extend(&rows[start..end]);
            }
            ModelEvent::RowsRemoved { .. } => self.retain(rows),
        }
    }
}
