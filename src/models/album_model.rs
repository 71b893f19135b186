//! Ordered list of albums mirrored from the store.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::models::{Album, ModelEvent, Notifier, SharedObserver, SharedStore};

/// Told about every album removed from the model, after its row is gone.
pub trait AlbumRemovedListener {
    fn album_removed(&mut self, album: &Album);
}

pub type SharedAlbumListener = Arc<Mutex<dyn AlbumRemovedListener + Send>>;

pub struct AlbumModel {
    store: SharedStore,
    albums: Vec<Album>,
    notifier: Notifier<Album>,
    removal_listeners: Vec<SharedAlbumListener>,
}

impl AlbumModel {
    /// Loads every album from the store. A failed query leaves the model empty.
    pub fn new(store: SharedStore) -> Self {
        let albums = store.lock().albums().unwrap_or_else(|e| {
            warn!(error = ?e, "Failed to load albums");
            Vec::new()
        });
        debug!(count = albums.len(), "Loaded albums");

        Self {
            store,
            albums,
            notifier: Notifier::new(),
            removal_listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: SharedObserver<Album>) {
        self.notifier.subscribe(observer);
    }

    pub fn unsubscribe(&mut self, observer: &SharedObserver<Album>) -> bool {
        self.notifier.unsubscribe(observer)
    }

    /// Registers a dependent that must react when albums are removed.
    pub fn connect_album_removed(&mut self, listener: SharedAlbumListener) {
        self.removal_listeners.push(listener);
    }

    /// Creates an album at the end of the list and returns its store id.
    pub fn add(&mut self, name: &str) -> Option<i64> {
        let mut album = Album::new(name);
        if let Err(e) = self.store.lock().add_album(&mut album) {
            warn!(error = ?e, name, "Failed to add album");
            return None;
        }

        let row = self.albums.len();
        let id = album.id;
        self.albums.push(album);
        debug!(id, row, "Album added");
        self.notifier
            .emit(&ModelEvent::RowsInserted { first: row, last: row }, &self.albums);
        Some(id)
    }

    /// Renames the album with `id`. Returns false if there is no such album.
    pub fn rename(&mut self, id: i64, new_name: &str) -> bool {
        match self.row_of(id) {
            Some(row) => self.set_name(row, new_name),
            None => false,
        }
    }

    /// Renames the album at `row`.
    pub fn set_name(&mut self, row: usize, new_name: &str) -> bool {
        let Some(album) = self.albums.get(row) else {
            return false;
        };
        let renamed = Album {
            id: album.id,
            name: new_name.to_string(),
        };
        self.update_album(row, &renamed)
    }

    /// Writes `album`'s name to the store and to the entry at `row`.
    ///
    /// `album.id` must be the id of the album at `row`. Nothing changes in
    /// memory unless the store row was updated.
    pub fn update_album(&mut self, row: usize, album: &Album) -> bool {
        let Some(current) = self.albums.get(row) else {
            return false;
        };
        if current.id != album.id {
            warn!(row, id = album.id, expected = current.id, "Album id does not match row");
            return false;
        }

        match self.store.lock().update_album(album) {
            Ok(true) => {}
            Ok(false) => {
                warn!(id = album.id, "Album missing from store");
                return false;
            }
            Err(e) => {
                warn!(error = ?e, id = album.id, "Failed to update album");
                return false;
            }
        }

        self.albums[row].name = album.name.clone();
        self.notifier
            .emit(&ModelEvent::DataChanged { first: row, last: row }, &self.albums);
        true
    }

    /// Removes the album with `id`. Returns false if there is no such album.
    pub fn remove(&mut self, id: i64) -> bool {
        match self.row_of(id) {
            Some(row) => self.remove_rows(row, 1),
            None => false,
        }
    }

    /// Removes `count` albums starting at `row`.
    ///
    /// Each album's store row is deleted and the removal listeners run before
    /// the views get `RowsRemoved`.
    pub fn remove_rows(&mut self, row: usize, count: usize) -> bool {
        if count == 0 || row.checked_add(count).map_or(true, |end| end > self.albums.len()) {
            return false;
        }

        let removed: Vec<Album> = self.albums.drain(row..row + count).collect();
        for album in &removed {
            if let Err(e) = self.store.lock().remove_album(album.id) {
                warn!(error = ?e, id = album.id, "Failed to delete album");
            }
            debug!(id = album.id, "Album removed");
            for listener in &self.removal_listeners {
                listener.lock().album_removed(album);
            }
        }

        self.notifier.emit(
            &ModelEvent::RowsRemoved {
                first: row,
                last: row + count - 1,
            },
            &self.albums,
        );
        true
    }

    pub fn list(&self) -> &[Album] {
        &self.albums
    }

    pub fn get(&self, row: usize) -> Option<&Album> {
        self.albums.get(row)
    }

    pub fn row_of(&self, id: i64) -> Option<usize> {
        self.albums.iter().position(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notify::testing::recorder;
    use crate::models::GalleryStore;

    fn shared_store() -> SharedStore {
        GalleryStore::open_in_memory().unwrap().into_shared()
    }

    #[derive(Default)]
    struct RemovedIds(Vec<i64>);

    impl AlbumRemovedListener for RemovedIds {
        fn album_removed(&mut self, album: &Album) {
            self.0.push(album.id);
        }
    }

    #[test]
    fn test_add_appends_with_unique_ids() {
        let mut model = AlbumModel::new(shared_store());

        let first = model.add("Trip").unwrap();
        let second = model.add("Trip").unwrap();

        assert_ne!(first, second);
        assert_eq!(model.len(), 2);
        assert_eq!(model.get(1).unwrap().id, second);
        assert_eq!(model.list()[1].name, "Trip");
    }

    #[test]
    fn test_add_notifies_rows_inserted() {
        let mut model = AlbumModel::new(shared_store());
        let rec = recorder();
        model.subscribe(rec.clone());

        model.add("One");
        model.add("Two");

        let rec = rec.lock();
        assert_eq!(
            rec.events,
            vec![
                ModelEvent::RowsInserted { first: 0, last: 0 },
                ModelEvent::RowsInserted { first: 1, last: 1 },
            ]
        );
        assert_eq!(rec.last_row_count, 2);
    }

    #[test]
    fn test_loads_existing_albums() {
        let store = shared_store();
        {
            let mut model = AlbumModel::new(store.clone());
            model.add("Kept");
        }

        let model = AlbumModel::new(store);
        assert_eq!(model.len(), 1);
        assert_eq!(model.list()[0].name, "Kept");
    }

    #[test]
    fn test_rename_updates_memory_and_store() {
        let store = shared_store();
        let mut model = AlbumModel::new(store.clone());
        let id = model.add("Before").unwrap();

        assert!(model.rename(id, "After"));
        assert_eq!(model.list()[0].name, "After");

        let persisted = store.lock().get_album(id).unwrap().unwrap();
        assert_eq!(persisted.name, "After");
    }

    #[test]
    fn test_rename_unknown_id_fails() {
        let mut model = AlbumModel::new(shared_store());
        model.add("Only");

        assert!(!model.rename(42, "Nope"));
        assert!(!model.set_name(5, "Nope"));
        assert_eq!(model.list()[0].name, "Only");
    }

    #[test]
    fn test_update_album_rejects_id_of_another_row() {
        let store = shared_store();
        let mut model = AlbumModel::new(store.clone());
        let a = model.add("A").unwrap();
        let b = model.add("B").unwrap();
        let rec = recorder();
        model.subscribe(rec.clone());

        let other = Album {
            id: b,
            name: "X".to_string(),
        };
        assert!(!model.update_album(0, &other));

        let names: Vec<_> = model.list().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(store.lock().get_album(a).unwrap().unwrap().name, "A");
        assert_eq!(store.lock().get_album(b).unwrap().unwrap().name, "B");
        assert!(rec.lock().events.is_empty());
    }

    #[test]
    fn test_update_album_missing_from_store_fails() {
        let store = shared_store();
        let mut model = AlbumModel::new(store.clone());
        let id = model.add("Gone").unwrap();
        store.lock().remove_album(id).unwrap();

        assert!(!model.rename(id, "Back"));
        assert_eq!(model.list()[0].name, "Gone");
    }

    #[test]
    fn test_remove_rows_bounds() {
        let mut model = AlbumModel::new(shared_store());
        model.add("A");
        model.add("B");

        assert!(!model.remove_rows(1, 2));
        assert!(!model.remove_rows(2, 1));
        assert!(!model.remove_rows(0, 0));
        assert!(!model.remove(99));
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_remove_deletes_row_and_notifies_listeners() {
        let store = shared_store();
        let mut model = AlbumModel::new(store.clone());
        let a = model.add("A").unwrap();
        let b = model.add("B").unwrap();
        let c = model.add("C").unwrap();

        let listener = Arc::new(Mutex::new(RemovedIds::default()));
        model.connect_album_removed(listener.clone());
        let rec = recorder();
        model.subscribe(rec.clone());

        assert!(model.remove_rows(0, 2));

        assert_eq!(listener.lock().0, vec![a, b]);
        assert_eq!(
            rec.lock().events,
            vec![ModelEvent::RowsRemoved { first: 0, last: 1 }]
        );
        assert_eq!(model.list().iter().map(|a| a.id).collect::<Vec<_>>(), vec![c]);
        assert!(store.lock().get_album(a).unwrap().is_none());
        assert!(store.lock().get_album(c).unwrap().is_some());
    }
}
