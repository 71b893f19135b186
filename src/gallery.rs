//! Wiring between the store, the list models and the thumbnail proxy.
//!
//! Removing an album goes through the album model, whose removal listener is
//! the picture model; the picture model's reset in turn reaches the
//! thumbnail cache. The coordinator only owns the handles and forwards the
//! user-level operations. When a library root is configured it also opens the
//! album folders there.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::GalleryConfig;
use crate::library::AlbumFolders;
use crate::models::{
    Album, AlbumModel, GalleryStore, Picture, PictureModel, SharedPictureModel, SharedStore,
};
use crate::thumbnails::{Thumbnail, ThumbnailProxy};

pub struct Gallery {
    store: SharedStore,
    albums: AlbumModel,
    pictures: SharedPictureModel,
    thumbnails: ThumbnailProxy,
    folders: Option<AlbumFolders>,
}

impl Gallery {
    /// Opens the database named by `config` and loads the album list.
    pub fn open(config: &GalleryConfig) -> Result<Self> {
        let store = GalleryStore::open(&config.database_path)?.into_shared();
        Self::with_store(store, config)
    }

    /// Opens the gallery described by the `GALLERY_*` environment.
    pub fn open_from_env() -> Result<Self> {
        Self::open(&GalleryConfig::from_env())
    }

    pub fn with_store(store: SharedStore, config: &GalleryConfig) -> Result<Self> {
        let mut albums = AlbumModel::new(store.clone());
        let pictures = PictureModel::new(store.clone()).into_shared();
        albums.connect_album_removed(pictures.clone());

        let mut thumbnails = ThumbnailProxy::new(config);
        thumbnails.set_source(pictures.clone());

        let folders = match &config.library_root {
            Some(root) => Some(
                AlbumFolders::open(root.clone())
                    .with_context(|| format!("Failed to open album library at {:?}", root))?,
            ),
            None => None,
        };

        info!(albums = albums.len(), library = ?config.library_root, "Gallery ready");
        Ok(Self {
            store,
            albums,
            pictures,
            thumbnails,
            folders,
        })
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn album_model(&self) -> &AlbumModel {
        &self.albums
    }

    pub fn album_model_mut(&mut self) -> &mut AlbumModel {
        &mut self.albums
    }

    pub fn picture_model(&self) -> &SharedPictureModel {
        &self.pictures
    }

    pub fn thumbnails(&self) -> &ThumbnailProxy {
        &self.thumbnails
    }

    /// Folder-backed album library, if a library root was configured.
    pub fn folders(&self) -> Option<&AlbumFolders> {
        self.folders.as_ref()
    }

    pub fn albums(&self) -> &[Album] {
        self.albums.list()
    }

    pub fn add_album(&mut self, name: &str) -> Option<i64> {
        self.albums.add(name)
    }

    pub fn rename_album(&mut self, id: i64, new_name: &str) -> bool {
        self.albums.rename(id, new_name)
    }

    /// Removes the album and, through the cascade, all of its pictures.
    pub fn remove_album(&mut self, id: i64) -> bool {
        self.albums.remove(id)
    }

    /// Makes `album_id` the album whose pictures are listed and thumbnailed.
    pub fn select_album(&mut self, album_id: i64) {
        self.pictures.lock().set_active_album(album_id);
    }

    pub fn active_album(&self) -> Option<i64> {
        self.pictures.lock().active_album()
    }

    /// Snapshot of the active album's pictures.
    pub fn pictures(&self) -> Vec<Picture> {
        self.pictures.lock().pictures().to_vec()
    }

    /// Adds a local file to the active album.
    pub fn add_picture(&mut self, path: &Path) -> Option<i64> {
        let picture = picture_for(path)?;
        self.pictures.lock().add(picture)
    }

    /// Adds several files to the active album; failures are skipped.
    pub fn add_pictures<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<i64> {
        let mut model = self.pictures.lock();
        paths
            .iter()
            .filter_map(|p| picture_for(p.as_ref()))
            .filter_map(|picture| model.add(picture))
            .collect()
    }

    pub fn remove_picture(&mut self, row: usize) -> bool {
        self.pictures.lock().remove(row)
    }

    pub fn thumbnail_for(&self, url: &str) -> Arc<Thumbnail> {
        self.thumbnails.thumbnail_for(url)
    }

    pub fn thumbnail_at(&self, row: usize) -> Option<Arc<Thumbnail>> {
        self.thumbnails.thumbnail_at(row)
    }
}

fn picture_for(path: &Path) -> Option<Picture> {
    let picture = Picture::from_path(path);
    if picture.is_none() {
        warn!(?path, "Skipping picture with a non UTF-8 path");
    }
    picture
}
