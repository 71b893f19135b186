//! SQLite-based persistence for albums and pictures.
//!
//! This module provides the `GalleryStore` struct which performs the plain
//! CRUD operations behind the list models:
//! - Albums (id, name)
//! - Pictures (id, album_id, url)
//!
//! The store does not enforce the album → pictures cascade; the picture
//! model issues `remove_pictures_for_album` when an album goes away.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::models::{Album, Picture};

/// Store handle shared by the album and picture models.
pub type SharedStore = Arc<Mutex<GalleryStore>>;

/// SQLite-backed storage for album and picture metadata.
pub struct GalleryStore {
    conn: Connection,
}

impl GalleryStore {
    /// Opens or creates the database at the specified path.
    ///
    /// Configures SQLite the same way for every gallery database:
    /// - journal_mode = WAL
    /// - synchronous = NORMAL
    /// - temp_store = MEMORY
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {:?}", parent)
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )
        .context("Failed to configure SQLite pragmas")?;

        let store = Self::with_connection(conn)?;
        info!("Opened gallery store at {:?}", path);
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    /// Wraps the store in the handle the models share.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    /// Creates the database schema if it doesn't exist.
    fn create_tables(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS albums (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT
            );

            CREATE TABLE IF NOT EXISTS pictures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                album_id INTEGER,
                url TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_pictures_album ON pictures(album_id);
            ",
            )
            .context("Failed to create database tables")?;

        debug!("Database tables created/verified");
        Ok(())
    }

    // =========================================================================
    // Albums
    // =========================================================================

    /// Inserts the album and stores the generated id back into it.
    pub fn add_album(&self, album: &mut Album) -> Result<i64> {
        self.conn
            .execute("INSERT INTO albums (name) VALUES (?1)", params![album.name])
            .context("Failed to insert album")?;

        album.id = self.conn.last_insert_rowid();
        Ok(album.id)
    }

    /// Writes the album's name. Returns false if no row has that id.
    pub fn update_album(&self, album: &Album) -> Result<bool> {
        let rows = self
            .conn
            .execute(
                "UPDATE albums SET name = ?1 WHERE id = ?2",
                params![album.name, album.id],
            )
            .context("Failed to update album")?;
        Ok(rows > 0)
    }

    pub fn remove_album(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM albums WHERE id = ?1", params![id])
            .context("Failed to delete album")?;
        Ok(rows > 0)
    }

    /// Returns all albums in insertion order.
    pub fn albums(&self) -> Result<Vec<Album>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM albums ORDER BY id")?;

        let albums = stmt
            .query_map([], |row| {
                Ok(Album {
                    id: row.get(0)?,
                    name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query albums")?;

        Ok(albums)
    }

    pub fn get_album(&self, id: i64) -> Result<Option<Album>> {
        let album = self
            .conn
            .query_row(
                "SELECT id, name FROM albums WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Album {
                        id: row.get(0)?,
                        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    })
                },
            )
            .optional()
            .context("Failed to query album")?;
        Ok(album)
    }

    pub fn album_exists(&self, id: i64) -> Result<bool> {
        let exists: bool = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM albums WHERE id = ?1)",
                params![id],
                |row| row.get(0),
            )
            .context("Failed to query album")?;
        Ok(exists)
    }

    // =========================================================================
    // Pictures
    // =========================================================================

    /// Returns the pictures of one album in insertion order.
    pub fn pictures_for_album(&self, album_id: i64) -> Result<Vec<Picture>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, album_id, url FROM pictures WHERE album_id = ?1 ORDER BY id",
        )?;

        let pictures = stmt
            .query_map(params![album_id], |row| {
                Ok(Picture {
                    id: row.get(0)?,
                    album_id: row.get(1)?,
                    file_url: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query pictures")?;

        Ok(pictures)
    }

    /// Inserts the picture under `album_id` and updates its id and album id.
    pub fn add_picture_in_album(&self, album_id: i64, picture: &mut Picture) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO pictures (album_id, url) VALUES (?1, ?2)",
                params![album_id, picture.file_url],
            )
            .context("Failed to insert picture")?;

        picture.id = self.conn.last_insert_rowid();
        picture.album_id = album_id;
        Ok(picture.id)
    }

    pub fn remove_picture(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM pictures WHERE id = ?1", params![id])
            .context("Failed to delete picture")?;
        Ok(rows > 0)
    }

    /// Deletes every picture of an album. Returns the number of rows removed.
    pub fn remove_pictures_for_album(&self, album_id: i64) -> Result<usize> {
        let rows = self
            .conn
            .execute("DELETE FROM pictures WHERE album_id = ?1", params![album_id])
            .context("Failed to delete pictures for album")?;

        if rows > 0 {
            debug!(album_id, rows, "Deleted pictures for album");
        }
        Ok(rows)
    }

    pub fn count_pictures_for_album(&self, album_id: i64) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pictures WHERE album_id = ?1",
            params![album_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // =========================================================================
    // Utility Methods
    // =========================================================================

    /// Gets database statistics for debugging.
    pub fn get_stats(&self) -> Result<DbStats> {
        let album_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))?;

        let picture_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pictures", [], |r| r.get(0))?;

        // Pictures whose album row is gone; should always be zero.
        let orphan_picture_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pictures p
             WHERE NOT EXISTS (SELECT 1 FROM albums a WHERE a.id = p.album_id)",
            [],
            |r| r.get(0),
        )?;

        Ok(DbStats {
            album_count,
            picture_count,
            orphan_picture_count,
        })
    }
}

/// Database statistics for debugging and monitoring.
#[derive(Debug, Clone)]
pub struct DbStats {
    pub album_count: i64,
    pub picture_count: i64,
    pub orphan_picture_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_create() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("test.sqlite");

        let store = GalleryStore::open(&db_path).unwrap();
        assert!(db_path.exists());

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.album_count, 0);
        assert_eq!(stats.picture_count, 0);
    }

    #[test]
    fn test_add_album_assigns_increasing_ids() {
        let store = GalleryStore::open_in_memory().unwrap();

        let mut first = Album::new("Trip");
        let mut second = Album::new("Trip");
        store.add_album(&mut first).unwrap();
        store.add_album(&mut second).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let albums = store.albums().unwrap();
        assert_eq!(albums, vec![first, second]);
    }

    #[test]
    fn test_update_and_remove_album() {
        let store = GalleryStore::open_in_memory().unwrap();
        let mut album = Album::new("Old");
        store.add_album(&mut album).unwrap();

        album.name = "New".to_string();
        assert!(store.update_album(&album).unwrap());
        assert_eq!(store.get_album(album.id).unwrap().unwrap().name, "New");
        assert!(store.album_exists(album.id).unwrap());

        assert!(store.remove_album(album.id).unwrap());
        assert!(!store.remove_album(album.id).unwrap());
        assert!(store.get_album(album.id).unwrap().is_none());
        assert!(!store.album_exists(album.id).unwrap());

        assert!(!store.update_album(&album).unwrap());
    }

    #[test]
    fn test_pictures_scoped_by_album() {
        let store = GalleryStore::open_in_memory().unwrap();
        let mut a = Album::new("A");
        let mut b = Album::new("B");
        store.add_album(&mut a).unwrap();
        store.add_album(&mut b).unwrap();

        let mut p1 = Picture::from_path(&PathBuf::from("/a/1.jpg")).unwrap();
        let mut p2 = Picture::from_path(&PathBuf::from("/b/2.jpg")).unwrap();
        store.add_picture_in_album(a.id, &mut p1).unwrap();
        store.add_picture_in_album(b.id, &mut p2).unwrap();

        assert_eq!(p1.album_id, a.id);
        assert_eq!(store.pictures_for_album(a.id).unwrap(), vec![p1.clone()]);
        assert_eq!(store.pictures_for_album(b.id).unwrap(), vec![p2]);

        assert!(store.remove_picture(p1.id).unwrap());
        assert!(store.pictures_for_album(a.id).unwrap().is_empty());
    }

    #[test]
    fn test_remove_pictures_for_album() {
        let store = GalleryStore::open_in_memory().unwrap();
        for url in ["/x/1.png", "/x/2.png", "/y/3.png"] {
            let album_id = if url.starts_with("/x") { 7 } else { 8 };
            let mut picture = Picture::new(url);
            store.add_picture_in_album(album_id, &mut picture).unwrap();
        }

        assert_eq!(store.remove_pictures_for_album(7).unwrap(), 2);
        assert_eq!(store.count_pictures_for_album(7).unwrap(), 0);
        assert_eq!(store.count_pictures_for_album(8).unwrap(), 1);
    }

    #[test]
    fn test_stats_report_orphans() {
        let store = GalleryStore::open_in_memory().unwrap();
        let mut picture = Picture::new("/lost.png");
        store.add_picture_in_album(99, &mut picture).unwrap();

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.picture_count, 1);
        assert_eq!(stats.orphan_picture_count, 1);
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.sqlite");

        {
            let store = GalleryStore::open(&db_path).unwrap();
            let mut album = Album::new("Persisted");
            store.add_album(&mut album).unwrap();
        }

        let store = GalleryStore::open(&db_path).unwrap();
        let albums = store.albums().unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].name, "Persisted");
    }
}
