//! Kodi watch-history export parsing
//!
//! Reads the tab-separated dump of Kodi's video library
//! (`strPath`, `strFileName`, `lastPlayed`, `playCount`) into
//! [`KodiWatchRecord`](crate::model::KodiWatchRecord)s.

mod export;
mod model;

pub use export::{parse_export, parse_export_reader, KodiEntry};
