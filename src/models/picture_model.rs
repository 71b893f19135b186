//! Pictures of the active album, mirrored from the store.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::models::{
    Album, AlbumRemovedListener, ModelEvent, Notifier, Picture, SharedObserver, SharedStore,
    UNSAVED_ID,
};

pub type SharedPictureModel = Arc<Mutex<PictureModel>>;

pub struct PictureModel {
    store: SharedStore,
    album_id: Option<i64>,
    pictures: Vec<Picture>,
    notifier: Notifier<Picture>,
}

impl PictureModel {
    /// Creates an empty model with no active album.
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            album_id: None,
            pictures: Vec::new(),
            notifier: Notifier::new(),
        }
    }

    pub fn into_shared(self) -> SharedPictureModel {
        Arc::new(Mutex::new(self))
    }

    pub fn subscribe(&mut self, observer: SharedObserver<Picture>) {
        self.notifier.subscribe(observer);
    }

    pub fn unsubscribe(&mut self, observer: &SharedObserver<Picture>) -> bool {
        self.notifier.unsubscribe(observer)
    }

    /// Switches to `album_id` and reloads its pictures from the store.
    ///
    /// Ids that can never be assigned by the store (`<= 0`) and ids with no
    /// album row select nothing.
    pub fn set_active_album(&mut self, album_id: i64) {
        if album_id > 0 && self.album_exists(album_id) {
            self.album_id = Some(album_id);
            self.pictures = self
                .store
                .lock()
                .pictures_for_album(album_id)
                .unwrap_or_else(|e| {
                    warn!(error = ?e, album_id, "Failed to load pictures");
                    Vec::new()
                });
        } else {
            self.album_id = None;
            self.pictures.clear();
        }

        debug!(album_id, count = self.pictures.len(), "Pictures loaded");
        self.notifier.emit(&ModelEvent::Reset, &self.pictures);
    }

    /// Stores `picture` and returns its new id.
    ///
    /// A picture without an album goes into the active album. Pictures for
    /// another album are stored but not shown. Albums missing from the store
    /// are refused.
    pub fn add(&mut self, picture: Picture) -> Option<i64> {
        let album_id = if picture.album_id == UNSAVED_ID {
            match self.album_id {
                Some(id) => id,
                None => {
                    warn!(url = %picture.file_url, "No active album for picture");
                    return None;
                }
            }
        } else {
            picture.album_id
        };

        if !self.album_exists(album_id) {
            warn!(album_id, url = %picture.file_url, "Picture refused for unknown album");
            return None;
        }

        let mut picture = picture;
        if let Err(e) = self.store.lock().add_picture_in_album(album_id, &mut picture) {
            warn!(error = ?e, album_id, "Failed to add picture");
            return None;
        }

        let id = picture.id;
        if self.album_id == Some(album_id) {
            let row = self.pictures.len();
            self.pictures.push(picture);
            self.notifier
                .emit(&ModelEvent::RowsInserted { first: row, last: row }, &self.pictures);
        }
        Some(id)
    }

    fn album_exists(&self, album_id: i64) -> bool {
        self.store.lock().album_exists(album_id).unwrap_or_else(|e| {
            warn!(error = ?e, album_id, "Failed to look up album");
            false
        })
    }

    /// Removes the picture at `index`.
    pub fn remove(&mut self, index: usize) -> bool {
        self.remove_rows(index, 1)
    }

    /// Removes `count` pictures starting at `row`.
    pub fn remove_rows(&mut self, row: usize, count: usize) -> bool {
        if count == 0 || row.checked_add(count).map_or(true, |end| end > self.pictures.len()) {
            return false;
        }

        for picture in self.pictures.drain(row..row + count) {
            if let Err(e) = self.store.lock().remove_picture(picture.id) {
                warn!(error = ?e, id = picture.id, "Failed to delete picture");
            }
        }

        self.notifier.emit(
            &ModelEvent::RowsRemoved {
                first: row,
                last: row + count - 1,
            },
            &self.pictures,
        );
        true
    }

    /// Deletes every picture of the active album, in memory and in the store.
    pub fn remove_all(&mut self) {
        if let Some(album_id) = self.album_id {
            if let Err(e) = self.store.lock().remove_pictures_for_album(album_id) {
                warn!(error = ?e, album_id, "Failed to delete pictures");
            }
        }
        self.pictures.clear();
        self.notifier.emit(&ModelEvent::Reset, &self.pictures);
    }

    /// Drops the in-memory pictures and the active album; the store is untouched.
    pub fn clear_album(&mut self) {
        self.album_id = None;
        self.pictures.clear();
        self.notifier.emit(&ModelEvent::Reset, &self.pictures);
    }

    /// Deletes the stored pictures of `album_id`, clearing the model if it
    /// was showing that album.
    pub fn delete_pictures_for_album(&mut self, album_id: i64) {
        if let Err(e) = self.store.lock().remove_pictures_for_album(album_id) {
            warn!(error = ?e, album_id, "Failed to delete pictures for removed album");
        }
        if self.album_id == Some(album_id) {
            self.clear_album();
        }
    }

    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    pub fn get(&self, row: usize) -> Option<&Picture> {
        self.pictures.get(row)
    }

    pub fn file_url(&self, row: usize) -> Option<&str> {
        self.pictures.get(row).map(|p| p.file_url.as_str())
    }

    pub fn active_album(&self) -> Option<i64> {
        self.album_id
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }
}

impl AlbumRemovedListener for PictureModel {
    fn album_removed(&mut self, album: &Album) {
        self.delete_pictures_for_album(album.id);
    }
}
