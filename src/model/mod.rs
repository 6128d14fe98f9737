//! Data model shared by the Kodi reader, the Jellyfin index and the writer
//!
//! Nothing here knows about TSV or SQLite.

mod library_item;
mod watch_record;
mod watch_state;

pub use library_item::{JellyfinLibraryItem, JellyfinUser};
pub use watch_record::KodiWatchRecord;
pub use watch_state::{apply_kodi_record, UserWatchState, WatchStateUpdate};
