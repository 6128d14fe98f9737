//! Per-user watch state and the pure Kodi -> Jellyfin update

use super::KodiWatchRecord;
use chrono::NaiveDateTime;

/// The watch fields of one user's data for one item
///
/// Other columns of the stored row (favorite, resume position, rating...)
/// are deliberately absent: the store never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWatchState {
    pub played: bool,
    pub play_count: u32,
    /// UTC
    pub last_played_date: Option<NaiveDateTime>,
}

/// Result of applying a Kodi record to an existing state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchStateUpdate {
    pub state: UserWatchState,

    /// False when `state` equals what was already stored
    pub changed: bool,
}

/// Compute the new watch state for `record`
///
/// Kodi's play count is authoritative and replaces Jellyfin's. A record without
/// a last-played time keeps whatever Jellyfin had. `last_played` must already
/// be in UTC.
pub fn apply_kodi_record(
    existing: Option<&UserWatchState>,
    record: &KodiWatchRecord,
    last_played: Option<NaiveDateTime>,
) -> WatchStateUpdate {
    let state = UserWatchState {
        played: record.play_count >= 1,
        play_count: record.play_count,
        last_played_date: last_played.or_else(|| existing.and_then(|s| s.last_played_date)),
    };

    let changed = existing != Some(&state);

    WatchStateUpdate { state, changed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 5, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn record(play_count: u32, last_played: Option<NaiveDateTime>) -> KodiWatchRecord {
        KodiWatchRecord {
            line: 1,
            directory_path: "/mnt/media/Movies/".to_string(),
            file_name: "Inception (2010).mkv".to_string(),
            last_played,
            play_count,
        }
    }

    #[test]
    fn test_new_state_from_record() {
        let rec = record(3, Some(at(20)));
        let update = apply_kodi_record(None, &rec, rec.last_played);

        assert!(update.changed);
        assert!(update.state.played);
        assert_eq!(update.state.play_count, 3);
        assert_eq!(update.state.last_played_date, Some(at(20)));
    }

    #[test]
    fn test_count_overwrites_instead_of_adding() {
        let existing = UserWatchState {
            played: true,
            play_count: 7,
            last_played_date: Some(at(10)),
        };
        let rec = record(2, Some(at(20)));
        let update = apply_kodi_record(Some(&existing), &rec, rec.last_played);

        assert_eq!(update.state.play_count, 2);
        assert_eq!(update.state.last_played_date, Some(at(20)));
        assert!(update.changed);
    }

    #[test]
    fn test_second_application_is_unchanged() {
        let rec = record(3, Some(at(20)));
        let first = apply_kodi_record(None, &rec, rec.last_played);
        let second = apply_kodi_record(Some(&first.state), &rec, rec.last_played);

        assert!(!second.changed);
        assert_eq!(second.state, first.state);
    }

    #[test]
    fn test_missing_last_played_keeps_existing() {
        let existing = UserWatchState {
            played: false,
            play_count: 0,
            last_played_date: Some(at(8)),
        };
        let rec = record(1, None);
        let update = apply_kodi_record(Some(&existing), &rec, None);

        assert!(update.state.played);
        assert_eq!(update.state.last_played_date, Some(at(8)));
    }
}
