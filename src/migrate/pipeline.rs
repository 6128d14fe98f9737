//! Main migration pipeline

use super::config::{KodiTimeZone, MigrationConfig};
use super::report::{RecordOutcome, Report};
use crate::jellyfin::{JellyfinData, SqliteWatchStateStore, WatchStateStore};
use crate::kodi::{self, KodiEntry};
use crate::matching::{normalize, LibraryIndex, MatchResult, NormalizedPath, TieBreak};
use crate::model::{apply_kodi_record, JellyfinLibraryItem, JellyfinUser, KodiWatchRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone};
use std::collections::HashMap;

/// Kodi export -> library lookup -> watch-state write
pub struct MigrationPipeline<S: WatchStateStore> {
    config: MigrationConfig,
    index: LibraryIndex,
    user: JellyfinUser,
    store: S,
    tie_break: Box<dyn TieBreak>,
}

impl MigrationPipeline<SqliteWatchStateStore> {
    /// Open the Jellyfin data directory and build the library index
    ///
    /// Any problem here is fatal: a partial index would produce wrong matches.
    pub fn open(config: MigrationConfig) -> Result<Self> {
        let data = JellyfinData::open(&config.jellyfin_data_dir, config.dry_run).with_context(
            || format!("Cannot use Jellyfin data directory {:?}", config.jellyfin_data_dir),
        )?;

        let user = data
            .user(&config.jellyfin_username)
            .context("Cannot resolve Jellyfin user")?;
        log::info!(
            "Updating watch state of Jellyfin user {:?} (id {})",
            user.username,
            user.internal_id
        );

        let items = data
            .library_items()
            .context("Cannot build Jellyfin library index")?;
        let index = LibraryIndex::new(items, config.ignore_extension);
        log::info!(
            "Library index: {} items, {} shared file names",
            index.len(),
            index.shared_key_count()
        );
        if index.is_empty() {
            log::warn!("Jellyfin library has no files; every record will be unmatched");
        }

        Ok(Self::new(config, index, user, data.into_store()))
    }
}

/// One export line between matching and writing
struct PendingRow {
    line: u64,
    kodi_path: String,
    step: Step,
}

enum Step {
    Decided(RecordOutcome),
    Matched {
        record: KodiWatchRecord,
        item: JellyfinLibraryItem,
    },
}

impl<S: WatchStateStore> MigrationPipeline<S> {
    pub fn new(config: MigrationConfig, index: LibraryIndex, user: JellyfinUser, store: S) -> Self {
        let tie_break = config.tie_break.build();
        Self {
            config,
            index,
            user,
            store,
            tie_break,
        }
    }

    /// Parse the configured Kodi export and migrate it
    pub fn migrate(&mut self) -> Result<Report> {
        log::info!("Reading Kodi export from {:?}", self.config.kodi_export);
        let entries = kodi::parse_export(&self.config.kodi_export)?;
        Ok(self.run(entries))
    }

    /// Process every entry; per-record failures end up in the report
    ///
    /// All records are matched before anything is written, so which Kodi file
    /// claims an item never depends on row order.
    pub fn run<I>(&mut self, entries: I) -> Report
    where
        I: IntoIterator<Item = KodiEntry>,
    {
        let mut rows: Vec<PendingRow> = entries
            .into_iter()
            .map(|entry| self.match_entry(entry))
            .collect();

        self.resolve_claims(&mut rows);

        let mut report = Report::new(self.config.dry_run);
        for row in rows {
            let outcome = match row.step {
                Step::Decided(outcome) => outcome,
                Step::Matched { record, item } => self.write_record(&record, item),
            };
            report.record(row.line, row.kodi_path, outcome);
        }

        report
    }

    fn match_entry(&self, entry: KodiEntry) -> PendingRow {
        let record = match entry {
            KodiEntry::Record(record) => record,
            KodiEntry::Skipped { line, path, reason } => {
                return PendingRow {
                    line,
                    kodi_path: path,
                    step: Step::Decided(RecordOutcome::Skipped { reason }),
                };
            }
            KodiEntry::Invalid(e) => {
                return PendingRow {
                    line: e.line(),
                    kodi_path: String::new(),
                    step: Step::Decided(RecordOutcome::Invalid(e)),
                };
            }
        };

        let line = record.line;
        let kodi_path = record.path();
        let step = match self.index.lookup(&kodi_path, self.tie_break.as_ref()) {
            MatchResult::Matched { item, candidates } => {
                if candidates > 1 {
                    log::info!(
                        "[line {}] {} of {} same-named items picked by {}",
                        record.line,
                        item.path,
                        candidates,
                        self.tie_break.name()
                    );
                }
                Step::Matched {
                    item: item.clone(),
                    record,
                }
            }
            MatchResult::NoMatch => Step::Decided(RecordOutcome::Unmatched),
            MatchResult::Ambiguous(items) => Step::Decided(RecordOutcome::Ambiguous {
                candidates: items.iter().map(|i| i.path.clone()).collect(),
            }),
        };

        PendingRow {
            line,
            kodi_path,
            step,
        }
    }

    /// Settle items matched by more than one distinct Kodi path
    ///
    /// The tie-break scores each Kodi path against the item's own path. The
    /// winner's rows go on to be written, the others become `Conflict`. With
    /// no unique winner every competing row is `Ambiguous`.
    fn resolve_claims(&self, rows: &mut [PendingRow]) {
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            if let Step::Matched { item, .. } = &row.step {
                groups.entry(item.item_id.clone()).or_default().push(i);
            }
        }

        for members in groups.into_values() {
            let mut paths: Vec<NormalizedPath> = Vec::new();
            for &i in &members {
                let path = normalize(&rows[i].kodi_path);
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
            if paths.len() < 2 {
                continue;
            }

            let item_path = match &rows[members[0]].step {
                Step::Matched { item, .. } => item.path.clone(),
                Step::Decided(_) => continue,
            };
            let target = normalize(&item_path);
            let candidates: Vec<&NormalizedPath> = paths.iter().collect();

            let winner = self
                .tie_break
                .choose(&target, &candidates)
                .and_then(|w| paths.get(w))
                .cloned();
            let winner_line = winner.as_ref().and_then(|w| {
                members
                    .iter()
                    .map(|&i| &rows[i])
                    .find(|row| normalize(&row.kodi_path) == *w)
                    .map(|row| row.line)
            });

            match winner_line {
                Some(line) => log::warn!(
                    "{} Kodi files match {}; keeping line {}",
                    paths.len(),
                    item_path,
                    line
                ),
                None => log::warn!(
                    "{} Kodi files match {} and none fits best; leaving it alone",
                    paths.len(),
                    item_path
                ),
            }

            let competing: Vec<String> = members
                .iter()
                .map(|&i| rows[i].kodi_path.clone())
                .collect();
            for &i in &members {
                let own = normalize(&rows[i].kodi_path);
                let outcome = match (&winner, winner_line) {
                    (Some(w), Some(_)) if *w == own => continue,
                    (Some(_), Some(claimed_by)) => RecordOutcome::Conflict {
                        item_path: item_path.clone(),
                        claimed_by,
                    },
                    _ => RecordOutcome::Ambiguous {
                        candidates: competing.clone(),
                    },
                };
                rows[i].step = Step::Decided(outcome);
            }
        }
    }

    /// Load -> apply -> save for one matched record
    fn write_record(&mut self, record: &KodiWatchRecord, item: JellyfinLibraryItem) -> RecordOutcome {
        let existing = match self.store.load(&self.user, &item.item_id) {
            Ok(existing) => existing,
            Err(e) => return RecordOutcome::WriteFailed(e.to_string()),
        };

        let last_played = record.last_played.map(|t| match self.config.kodi_time_zone {
            KodiTimeZone::Utc => t,
            KodiTimeZone::Local => local_to_utc(&Local, t),
        });
        let update = apply_kodi_record(existing.as_ref(), record, last_played);

        if !update.changed {
            return RecordOutcome::Unchanged {
                item_id: item.item_id,
                item_path: item.path,
            };
        }

        if !self.config.dry_run {
            if let Err(e) = self
                .store
                .save(&self.user, &item.item_id, &update.state, existing.is_some())
            {
                return RecordOutcome::WriteFailed(e.to_string());
            }
        }

        RecordOutcome::Written {
            item_id: item.item_id,
            item_path: item.path,
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Convert a naive wall-clock time in `zone` to UTC
///
/// Times inside a DST gap don't exist in `zone` and are copied as is; times
/// repeated by a DST fold take the earlier instant.
pub fn local_to_utc<Tz: TimeZone>(zone: &Tz, kodi_time: NaiveDateTime) -> NaiveDateTime {
    resolve_local(kodi_time, zone.from_local_datetime(&kodi_time))
}

fn resolve_local<Tz: TimeZone>(kodi_time: NaiveDateTime, mapped: LocalResult<DateTime<Tz>>) -> NaiveDateTime {
    match mapped.earliest() {
        Some(local) => local.naive_utc(),
        None => {
            log::warn!("{} does not exist in the local time zone; copied as is", kodi_time);
            kodi_time
        }
    }
}
