//! Per-user watch state persistence
//!
//! The only code that knows how Jellyfin lays out user data. Writes touch
//! `played`, `playCount` and `lastPlayedDate` and nothing else, so favorite
//! flags, resume positions and ratings survive untouched.

use super::schema::{self, format_timestamp, parse_timestamp};
use crate::error::WriteError;
use crate::model::{JellyfinUser, UserWatchState};
use rusqlite::{params, Connection, OptionalExtension};

/// Load/save boundary for watch state
pub trait WatchStateStore {
    /// Current watch state, None if the user has no data for the item
    fn load(&self, user: &JellyfinUser, item_id: &str) -> Result<Option<UserWatchState>, WriteError>;

    /// Persist `state`. `existed` tells whether `load` found a row.
    fn save(
        &mut self,
        user: &JellyfinUser,
        item_id: &str,
        state: &UserWatchState,
        existed: bool,
    ) -> Result<(), WriteError>;
}

/// Watch state kept in `library.db`'s `UserDatas` table
#[derive(Debug)]
pub struct SqliteWatchStateStore {
    conn: Connection,
}

impl SqliteWatchStateStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn write_error(item_id: &str, source: rusqlite::Error) -> WriteError {
    WriteError {
        item_id: item_id.to_string(),
        source,
    }
}

impl WatchStateStore for SqliteWatchStateStore {
    fn load(&self, user: &JellyfinUser, item_id: &str) -> Result<Option<UserWatchState>, WriteError> {
        let sql = format!(
            "SELECT played, playCount, lastPlayedDate FROM {} WHERE key = ?1 AND userId = ?2",
            schema::USER_DATA_TABLE
        );

        self.conn
            .query_row(&sql, params![item_id, user.internal_id], |row| {
                let played: i64 = row.get(0)?;
                let play_count: i64 = row.get(1)?;
                Ok(UserWatchState {
                    played: played != 0,
                    play_count: u32::try_from(play_count.max(0)).unwrap_or(u32::MAX),
                    last_played_date: parse_timestamp(row.get_ref(2)?),
                })
            })
            .optional()
            .map_err(|source| write_error(item_id, source))
    }

    fn save(
        &mut self,
        user: &JellyfinUser,
        item_id: &str,
        state: &UserWatchState,
        existed: bool,
    ) -> Result<(), WriteError> {
        let last_played = state.last_played_date.map(format_timestamp);

        if existed {
            // An unparseable stored date is left as is when there is nothing to replace it
            let sql = format!(
                "UPDATE {} SET played = ?1, playCount = ?2, \
                 lastPlayedDate = COALESCE(?3, lastPlayedDate) \
                 WHERE key = ?4 AND userId = ?5",
                schema::USER_DATA_TABLE
            );
            self.conn
                .execute(
                    &sql,
                    params![
                        state.played,
                        state.play_count,
                        last_played,
                        item_id,
                        user.internal_id
                    ],
                )
                .map_err(|source| write_error(item_id, source))?;
        } else {
            let sql = format!(
                "INSERT INTO {} (key, userId, played, playCount, isFavorite, \
                 playbackPositionTicks, lastPlayedDate) \
                 VALUES (?1, ?2, ?3, ?4, 0, 0, ?5)",
                schema::USER_DATA_TABLE
            );
            self.conn
                .execute(
                    &sql,
                    params![
                        item_id,
                        user.internal_id,
                        state.played,
                        state.play_count,
                        last_played
                    ],
                )
                .map_err(|source| write_error(item_id, source))?;
        }

        Ok(())
    }
}
