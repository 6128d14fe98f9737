//! Error taxonomy for a migration run
//!
//! Only [`LibraryIndexError`] is fatal. Everything else is scoped to a single
//! Kodi record and ends up as a line in the [`crate::migrate::Report`].

use std::path::PathBuf;
use thiserror::Error;

/// The Jellyfin data directory cannot be used as a lookup source.
#[derive(Debug, Error)]
pub enum LibraryIndexError {
    #[error("Jellyfin database not found: {0:?} (is this a Jellyfin data directory?)")]
    MissingDatabase(PathBuf),

    #[error("table `{table}` missing from {database:?}; unsupported Jellyfin schema")]
    MissingTable { database: PathBuf, table: &'static str },

    #[error("column `{table}.{column}` missing from {database:?}; unsupported Jellyfin schema")]
    MissingColumn {
        database: PathBuf,
        table: &'static str,
        column: &'static str,
    },

    #[error("no Jellyfin user named {0:?}")]
    UnknownUser(String),

    #[error("failed to read Jellyfin database {database:?}: {source}")]
    Sqlite {
        database: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

/// A row of the Kodi export that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputParseError {
    #[error("line {line}: expected 4 tab-separated columns, found {found}")]
    ColumnCount { line: u64, found: usize },

    #[error("line {line}: invalid lastPlayed {value:?}")]
    Timestamp { line: u64, value: String },

    #[error("line {line}: invalid playCount {value:?}")]
    PlayCount { line: u64, value: String },

    #[error("line {line}: {message}")]
    Malformed { line: u64, message: String },
}

impl InputParseError {
    /// 1-based line number of the offending row
    pub fn line(&self) -> u64 {
        match self {
            Self::ColumnCount { line, .. }
            | Self::Timestamp { line, .. }
            | Self::PlayCount { line, .. }
            | Self::Malformed { line, .. } => *line,
        }
    }
}

/// Reading or persisting one watch state failed.
#[derive(Debug, Error)]
#[error("failed to update watch state for item {item_id}: {source}")]
pub struct WriteError {
    pub item_id: String,
    #[source]
    pub source: rusqlite::Error,
}
