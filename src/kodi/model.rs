//! Raw export row, as produced by the Kodi database query

use chrono::{NaiveDateTime, SubsecRound};
use serde::Deserialize;

/// Column count of a valid row
pub const COLUMN_COUNT: usize = 4;

/// Value of the first column when the export carries a header line
pub const HEADER_MARKER: &str = "strPath";

/// Kodi's multi-part file list; Jellyfin keys each part separately
pub const STACK_SCHEME: &str = "stack://";

/// Sources Jellyfin never tracks by file path
pub const UNSUPPORTED_SCHEMES: &[&str] = &["plugin://", "videodb://", "http://", "https://", "upnp://"];

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

#[derive(Debug, Clone, Deserialize)]
pub struct KodiRow {
    #[serde(rename = "strPath")]
    pub str_path: String,
    #[serde(rename = "strFileName")]
    pub str_file_name: String,
    #[serde(rename = "lastPlayed")]
    pub last_played: String,
    #[serde(rename = "playCount")]
    pub play_count: String,
}

impl KodiRow {
    /// Parse `lastPlayed`; `Ok(None)` for NULL/empty
    ///
    /// Fractions are dropped: Jellyfin stores whole seconds.
    pub fn parse_last_played(&self) -> Result<Option<NaiveDateTime>, chrono::ParseError> {
        let value = self.last_played.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("NULL") {
            return Ok(None);
        }

        TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|parsed| parsed.trunc_subsecs(0))
            .map_or_else(
                || NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMATS[0]).map(Some),
                |parsed| Ok(Some(parsed)),
            )
    }

    /// Parse `playCount`; only counts >= 1 are meaningful
    pub fn parse_play_count(&self) -> Option<u32> {
        self.play_count
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|count| *count >= 1)
    }

    /// Why Jellyfin cannot hold this row, if it cannot
    pub fn unsupported_reason(&self) -> Option<&'static str> {
        if self.str_file_name.trim().is_empty() {
            return Some("empty path");
        }

        let lower = self.str_path.to_ascii_lowercase();
        if lower.starts_with(STACK_SCHEME)
            || self.str_file_name.to_ascii_lowercase().starts_with(STACK_SCHEME)
        {
            return Some("multi-part stack");
        }

        if UNSUPPORTED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
            return Some("not a file on disk");
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(path: &str, file: &str, last: &str, count: &str) -> KodiRow {
        KodiRow {
            str_path: path.to_string(),
            str_file_name: file.to_string(),
            last_played: last.to_string(),
            play_count: count.to_string(),
        }
    }

    #[test]
    fn test_timestamp_forms() {
        for value in [
            "2021-05-01 20:00:00",
            "2021-05-01T20:00:00",
            "2021-05-01 20:00:00.000",
        ] {
            let parsed = row("/", "a", value, "1").parse_last_played().unwrap();
            assert_eq!(parsed.unwrap().to_string(), "2021-05-01 20:00:00");
        }
    }

    #[test]
    fn test_fractional_seconds_are_dropped() {
        let parsed = row("/m/", "a", "2021-05-01 20:00:00.500", "1")
            .parse_last_played()
            .unwrap()
            .unwrap();
        assert_eq!(parsed.to_string(), "2021-05-01 20:00:00");
    }

    #[test]
    fn test_null_timestamp() {
        assert_eq!(row("/m/", "a", "NULL", "1").parse_last_played(), Ok(None));
        assert_eq!(row("/m/", "a", "", "1").parse_last_played(), Ok(None));
        assert!(row("/m/", "a", "yesterday", "1").parse_last_played().is_err());
    }

    #[test]
    fn test_play_count() {
        assert_eq!(row("/m/", "a", "", " 3 ").parse_play_count(), Some(3));
        assert_eq!(row("/m/", "a", "", "0").parse_play_count(), None);
        assert_eq!(row("/m/", "a", "", "-1").parse_play_count(), None);
    }

    #[test]
    fn test_unsupported_sources() {
        assert_eq!(row("/", "", "", "1").unsupported_reason(), Some("empty path"));
        assert_eq!(
            row("plugin://plugin.video.youtube/", "x", "", "1").unsupported_reason(),
            Some("not a file on disk")
        );
        assert_eq!(row("smb://nas/Movies/", "Heat.mkv", "", "1").unsupported_reason(), None);
    }

    #[test]
    fn test_directory_without_file_name_is_skipped() {
        assert_eq!(
            row("smb://nas/Movies/Heat (1995)/", "", "", "1").unsupported_reason(),
            Some("empty path")
        );
    }

    #[test]
    fn test_stacks_are_skipped() {
        assert_eq!(
            row(
                "smb://nas/Movies/",
                "stack://smb://nas/Movies/Heat-cd1.avi , smb://nas/Movies/Heat-cd2.avi",
                "",
                "1"
            )
            .unsupported_reason(),
            Some("multi-part stack")
        );
        assert_eq!(
            row("stack://smb://nas/Movies/", "Heat-cd1.avi", "", "1").unsupported_reason(),
            Some("multi-part stack")
        );
    }
}
