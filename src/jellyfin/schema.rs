//! Jellyfin on-disk layout and SQLite schema knowledge
//!
//! Targets the pre-EF Core layout (Jellyfin 10.x): `library.db` holds items
//! and user data, `jellyfin.db` holds accounts. Both live in `<data dir>/data/`.

use crate::error::LibraryIndexError;
use chrono::{DateTime, NaiveDateTime};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

pub const LIBRARY_DB: &str = "library.db";
pub const JELLYFIN_DB: &str = "jellyfin.db";

pub const ITEMS_TABLE: &str = "TypedBaseItems";
pub const ITEMS_COLUMNS: &[&str] = &["Path", "UserDataKey", "IsFolder"];

pub const USER_DATA_TABLE: &str = "UserDatas";
pub const USER_DATA_COLUMNS: &[&str] = &[
    "key",
    "userId",
    "played",
    "playCount",
    "isFavorite",
    "playbackPositionTicks",
    "lastPlayedDate",
];

pub const USERS_TABLE: &str = "Users";
pub const USERS_COLUMNS: &[&str] = &["InternalId", "Username"];

/// Jellyfin writes UTC dates as text in this shape
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

const TIMESTAMP_PARSE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Database files of a Jellyfin data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub library_db: PathBuf,
    pub jellyfin_db: PathBuf,
}

/// Find the databases under `data_dir`
///
/// Accepts the data directory itself (`/var/lib/jellyfin`) or its inner
/// `data/` directory.
pub fn locate(data_dir: &Path) -> Result<DataPaths, LibraryIndexError> {
    let inner = data_dir.join("data");
    let base = if inner.join(LIBRARY_DB).is_file() {
        inner
    } else {
        data_dir.to_path_buf()
    };

    let paths = DataPaths {
        library_db: base.join(LIBRARY_DB),
        jellyfin_db: base.join(JELLYFIN_DB),
    };

    for db in [&paths.library_db, &paths.jellyfin_db] {
        if !db.is_file() {
            return Err(LibraryIndexError::MissingDatabase(db.clone()));
        }
    }

    Ok(paths)
}

/// Open an existing database; never creates one
pub fn open(path: &Path, read_only: bool) -> Result<Connection, LibraryIndexError> {
    let flags = if read_only {
        OpenFlags::SQLITE_OPEN_READ_ONLY
    } else {
        OpenFlags::SQLITE_OPEN_READ_WRITE
    };

    Connection::open_with_flags(path, flags | OpenFlags::SQLITE_OPEN_NO_MUTEX)
        .map_err(|source| sqlite_error(path, source))
}

/// Check that `table` exists with at least `columns`
pub fn require_table(
    conn: &Connection,
    database: &Path,
    table: &'static str,
    columns: &[&'static str],
) -> Result<(), LibraryIndexError> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(|source| sqlite_error(database, source))?;

    let present = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(|source| sqlite_error(database, source))?;

    if present.is_empty() {
        return Err(LibraryIndexError::MissingTable {
            database: database.to_path_buf(),
            table,
        });
    }

    for column in columns {
        if !present.iter().any(|p| p.eq_ignore_ascii_case(column)) {
            return Err(LibraryIndexError::MissingColumn {
                database: database.to_path_buf(),
                table,
                column,
            });
        }
    }

    Ok(())
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Read a stored `lastPlayedDate`
///
/// Jellyfin stores text; older migration scripts stored Unix seconds.
/// Anything else reads as None.
pub fn parse_timestamp(value: ValueRef<'_>) -> Option<NaiveDateTime> {
    match value {
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).ok()?.trim();
            TIMESTAMP_PARSE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .or_else(|| {
                    DateTime::parse_from_rfc3339(text)
                        .ok()
                        .map(|dt| dt.naive_utc())
                })
        }
        ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc()),
        _ => None,
    }
}

pub(crate) fn sqlite_error(database: &Path, source: rusqlite::Error) -> LibraryIndexError {
    LibraryIndexError::Sqlite {
        database: database.to_path_buf(),
        source,
    }
}
