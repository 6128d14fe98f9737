//! Jellyfin data directory access
//!
//! Opens the databases of a (stopped) Jellyfin installation, checks that they
//! look like a schema this tool understands, and exposes the library items,
//! the target user and the watch-state store.

mod library;
pub mod schema;
mod store;

pub use library::{find_user, load_library_items};
pub use store::{SqliteWatchStateStore, WatchStateStore};

use crate::error::LibraryIndexError;
use crate::model::{JellyfinLibraryItem, JellyfinUser};
use rusqlite::Connection;
use schema::DataPaths;
use std::path::Path;

/// Open handles on a Jellyfin data directory
#[derive(Debug)]
pub struct JellyfinData {
    paths: DataPaths,
    library: Connection,
    users: Connection,
}

impl JellyfinData {
    /// Open and validate the data directory
    ///
    /// Fails if a database or any table/column this tool relies on is
    /// missing. With `read_only` nothing can be written.
    pub fn open(data_dir: &Path, read_only: bool) -> Result<Self, LibraryIndexError> {
        let paths = schema::locate(data_dir)?;
        log::info!("Jellyfin library database: {:?}", paths.library_db);

        let library = schema::open(&paths.library_db, read_only)?;
        schema::require_table(
            &library,
            &paths.library_db,
            schema::ITEMS_TABLE,
            schema::ITEMS_COLUMNS,
        )?;
        schema::require_table(
            &library,
            &paths.library_db,
            schema::USER_DATA_TABLE,
            schema::USER_DATA_COLUMNS,
        )?;

        let users = schema::open(&paths.jellyfin_db, true)?;
        schema::require_table(
            &users,
            &paths.jellyfin_db,
            schema::USERS_TABLE,
            schema::USERS_COLUMNS,
        )?;

        Ok(Self {
            paths,
            library,
            users,
        })
    }

    pub fn user(&self, username: &str) -> Result<JellyfinUser, LibraryIndexError> {
        find_user(&self.users, &self.paths.jellyfin_db, username)
    }

    pub fn library_items(&self) -> Result<Vec<JellyfinLibraryItem>, LibraryIndexError> {
        load_library_items(&self.library, &self.paths.library_db)
    }

    /// Hand the library connection over to the watch-state store
    pub fn into_store(self) -> SqliteWatchStateStore {
        SqliteWatchStateStore::new(self.library)
    }
}
