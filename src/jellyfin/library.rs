//! Reading items and users out of Jellyfin's databases

use super::schema::{self, sqlite_error};
use crate::error::LibraryIndexError;
use crate::model::{JellyfinLibraryItem, JellyfinUser};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Every non-folder item that has a source file and a user-data key
pub fn load_library_items(
    conn: &Connection,
    database: &Path,
) -> Result<Vec<JellyfinLibraryItem>, LibraryIndexError> {
    let sql = format!(
        "SELECT UserDataKey, Path FROM {} \
         WHERE Path IS NOT NULL AND UserDataKey IS NOT NULL AND IsFolder = 0",
        schema::ITEMS_TABLE
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|source| sqlite_error(database, source))?;

    let items = stmt
        .query_map([], |row| {
            Ok(JellyfinLibraryItem {
                item_id: row.get(0)?,
                path: row.get(1)?,
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(|source| sqlite_error(database, source))?;

    log::debug!("Loaded {} library items from {:?}", items.len(), database);
    Ok(items)
}

/// Look up a Jellyfin account by name (case-insensitive, like Jellyfin's login)
pub fn find_user(
    conn: &Connection,
    database: &Path,
    username: &str,
) -> Result<JellyfinUser, LibraryIndexError> {
    let sql = format!(
        "SELECT InternalId, Username FROM {} WHERE Username = ?1 COLLATE NOCASE",
        schema::USERS_TABLE
    );

    conn.query_row(&sql, [username], |row| {
        Ok(JellyfinUser {
            internal_id: row.get(0)?,
            username: row.get(1)?,
        })
    })
    .optional()
    .map_err(|source| sqlite_error(database, source))?
    .ok_or_else(|| LibraryIndexError::UnknownUser(username.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE TypedBaseItems (guid BLOB, Path TEXT, UserDataKey TEXT, IsFolder BIT);
             INSERT INTO TypedBaseItems VALUES (x'01', '/media/movies/Heat.mkv', 'heat-key', 0);
             INSERT INTO TypedBaseItems VALUES (x'02', '/media/movies', 'folder-key', 1);
             INSERT INTO TypedBaseItems VALUES (x'03', NULL, 'virtual-key', 0);
             INSERT INTO TypedBaseItems VALUES (x'04', '/media/movies/Alien.mkv', NULL, 0);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_only_files_with_keys_are_loaded() {
        let conn = library_db();
        let items = load_library_items(&conn, Path::new("library.db")).unwrap();

        assert_eq!(
            items,
            vec![JellyfinLibraryItem {
                item_id: "heat-key".to_string(),
                path: "/media/movies/Heat.mkv".to_string(),
            }]
        );
    }

    #[test]
    fn test_find_user_ignores_case() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Users (InternalId INTEGER, Username TEXT);
             INSERT INTO Users VALUES (1, 'admin');
             INSERT INTO Users VALUES (2, 'Alice');",
        )
        .unwrap();
        let db = Path::new("jellyfin.db");

        let user = find_user(&conn, db, "alice").unwrap();
        assert_eq!(user.internal_id, 2);
        assert_eq!(user.username, "Alice");

        assert!(matches!(
            find_user(&conn, db, "bob"),
            Err(LibraryIndexError::UnknownUser(name)) if name == "bob"
        ));
    }
}
