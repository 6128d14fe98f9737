//! kodi2jellyfin - Kodi watch history to Jellyfin migrator
//!
//! This library copies play counts and last-played dates from a Kodi video
//! library export into a stopped Jellyfin server's data directory, matching
//! files by name.

pub mod error;
pub mod jellyfin;
pub mod kodi;
pub mod matching;
pub mod migrate;
pub mod model;

pub use migrate::config::MigrationConfig;
pub use migrate::pipeline::MigrationPipeline;
