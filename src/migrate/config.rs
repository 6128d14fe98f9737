//! Migration configuration

use crate::matching::TieBreakStrategy;
use std::path::PathBuf;

/// How to read Kodi's naive `lastPlayed` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KodiTimeZone {
    /// Copy verbatim
    #[default]
    Utc,

    /// Kodi wrote the host's local wall-clock time; convert to UTC
    Local,
}

/// Configuration for one migration run
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Kodi TSV export
    pub kodi_export: PathBuf,

    /// Working copy of the Jellyfin data directory (mutated in place)
    pub jellyfin_data_dir: PathBuf,

    /// Jellyfin account whose watch state is updated
    pub jellyfin_username: String,

    pub tie_break: TieBreakStrategy,

    /// Match `Movie.avi` against `Movie.mkv`
    pub ignore_extension: bool,

    pub kodi_time_zone: KodiTimeZone,

    /// Match and report only, write nothing
    pub dry_run: bool,
}

impl MigrationConfig {
    /// Defaults: longest-suffix tie-break, exact extensions, UTC, writes enabled
    pub fn new(kodi_export: PathBuf, jellyfin_data_dir: PathBuf, jellyfin_username: String) -> Self {
        Self {
            kodi_export,
            jellyfin_data_dir,
            jellyfin_username,
            tie_break: TieBreakStrategy::default(),
            ignore_extension: false,
            kodi_time_zone: KodiTimeZone::default(),
            dry_run: false,
        }
    }

    /// How to pick between same-named library items
    pub fn with_tie_break(mut self, tie_break: TieBreakStrategy) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Compare file names without their extensions
    pub fn with_ignore_extension(mut self, ignore_extension: bool) -> Self {
        self.ignore_extension = ignore_extension;
        self
    }

    /// Time zone Kodi wrote `lastPlayed` in
    pub fn with_kodi_time_zone(mut self, zone: KodiTimeZone) -> Self {
        self.kodi_time_zone = zone;
        self
    }

    /// Report what would change without writing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
