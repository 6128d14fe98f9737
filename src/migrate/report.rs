//! Per-record outcomes and the end-of-run summary

use crate::error::InputParseError;
use std::fmt;

/// What happened to one line of the Kodi export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Watch state written (or would be, in a dry run)
    Written { item_id: String, item_path: String },

    /// Jellyfin already had exactly this state
    Unchanged { item_id: String, item_path: String },

    /// No library item with this file name
    Unmatched,

    /// Several items fit and none could be chosen safely
    Ambiguous { candidates: Vec<String> },

    /// A better-fitting Kodi file (at line `claimed_by`) owns the item
    Conflict { item_path: String, claimed_by: u64 },

    /// Nothing Jellyfin tracks by file path
    Skipped { reason: &'static str },

    /// Row could not be parsed
    Invalid(InputParseError),

    /// Loading or saving the watch state failed
    WriteFailed(String),
}

impl RecordOutcome {
    fn label(&self, dry_run: bool) -> &'static str {
        match self {
            RecordOutcome::Written { .. } if dry_run => "WOULD WRITE",
            RecordOutcome::Written { .. } => "WRITTEN",
            RecordOutcome::Unchanged { .. } => "UNCHANGED",
            RecordOutcome::Unmatched => "UNMATCHED",
            RecordOutcome::Ambiguous { .. } | RecordOutcome::Conflict { .. } => "AMBIGUOUS",
            RecordOutcome::Skipped { .. } => "SKIPPED",
            RecordOutcome::Invalid(_) => "INVALID",
            RecordOutcome::WriteFailed(_) => "WRITE ERROR",
        }
    }
}

/// One line of the detail report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    pub line: u64,
    pub kodi_path: String,
    pub outcome: RecordOutcome,
}

/// Counts per outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub unchanged: usize,
    pub unmatched: usize,
    pub ambiguous: usize,
    pub skipped: usize,
    pub invalid: usize,
    pub write_errors: usize,
}

/// Everything the operator needs before restarting Jellyfin
#[derive(Debug, Clone, Default)]
pub struct Report {
    dry_run: bool,
    records: Vec<RecordReport>,
    summary: Summary,
}

impl Report {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Log the detail line and count it
    pub fn record(&mut self, line: u64, kodi_path: impl Into<String>, outcome: RecordOutcome) {
        let entry = RecordReport {
            line,
            kodi_path: kodi_path.into(),
            outcome,
        };
        let detail = DetailLine {
            entry: &entry,
            dry_run: self.dry_run,
        };

        let summary = &mut self.summary;
        match &entry.outcome {
            RecordOutcome::Written { .. } => {
                summary.written += 1;
                log::info!("{}", detail);
            }
            RecordOutcome::Unchanged { .. } => {
                summary.unchanged += 1;
                log::info!("{}", detail);
            }
            RecordOutcome::Unmatched => {
                summary.unmatched += 1;
                log::info!("{}", detail);
            }
            RecordOutcome::Ambiguous { .. } | RecordOutcome::Conflict { .. } => {
                summary.ambiguous += 1;
                log::warn!("{}", detail);
            }
            RecordOutcome::Skipped { .. } => {
                summary.skipped += 1;
                log::debug!("{}", detail);
            }
            RecordOutcome::Invalid(_) => {
                summary.invalid += 1;
                log::warn!("{}", detail);
            }
            RecordOutcome::WriteFailed(_) => {
                summary.write_errors += 1;
                log::error!("{}", detail);
            }
        }

        self.records.push(entry);
    }

    pub fn records(&self) -> &[RecordReport] {
        &self.records
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// True if any watch state failed to write
    pub fn has_failures(&self) -> bool {
        self.summary.write_errors > 0
    }

    /// Kodi paths that have no counterpart in Jellyfin
    pub fn unmatched_paths(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|r| r.outcome == RecordOutcome::Unmatched)
            .map(|r| r.kodi_path.as_str())
    }

    /// Print the unmatched block and the summary counts
    pub fn log_summary(&self) {
        if self.summary.unmatched > 0 {
            let mut warning = String::from(
                "These files are marked as watched in Kodi but don't exist in Jellyfin:",
            );
            for path in self.unmatched_paths() {
                warning.push_str("\n  ");
                warning.push_str(path);
            }
            log::warn!("{}", warning);
        }

        let s = &self.summary;
        log::info!("===========================================");
        if self.dry_run {
            log::info!("Dry run: nothing was written");
        }
        log::info!("  {:<12} {}", if self.dry_run { "would write" } else { "written" }, s.written);
        log::info!("  {:<12} {}", "unchanged", s.unchanged);
        log::info!("  {:<12} {}", "unmatched", s.unmatched);
        log::info!("  {:<12} {}", "ambiguous", s.ambiguous);
        log::info!("  {:<12} {}", "skipped", s.skipped);
        log::info!("  {:<12} {}", "invalid", s.invalid);
        log::info!("  {:<12} {}", "write errors", s.write_errors);
    }
}

struct DetailLine<'a> {
    entry: &'a RecordReport,
    dry_run: bool,
}

impl fmt::Display for DetailLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry = self.entry;
        write!(
            f,
            "[line {}] {}: {}",
            entry.line,
            entry.outcome.label(self.dry_run),
            entry.kodi_path
        )?;

        match &entry.outcome {
            RecordOutcome::Written { item_id, item_path }
            | RecordOutcome::Unchanged { item_id, item_path } => {
                write!(f, " -> {} ({})", item_path, item_id)
            }
            RecordOutcome::Unmatched => Ok(()),
            RecordOutcome::Ambiguous { candidates } => {
                write!(f, " -> candidates: {}", candidates.join(", "))
            }
            RecordOutcome::Conflict {
                item_path,
                claimed_by,
            } => write!(f, " -> {} already taken by line {}", item_path, claimed_by),
            RecordOutcome::Skipped { reason } => write!(f, " ({})", reason),
            RecordOutcome::Invalid(e) => write!(f, " ({})", e),
            RecordOutcome::WriteFailed(e) => write!(f, " ({})", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written() -> RecordOutcome {
        RecordOutcome::Written {
            item_id: "k".to_string(),
            item_path: "/m/a.mkv".to_string(),
        }
    }

    #[test]
    fn test_counts() {
        let mut report = Report::new(false);
        report.record(1, "/a.mkv", written());
        report.record(2, "/b.mkv", RecordOutcome::Unmatched);
        report.record(3, "/c.mkv", RecordOutcome::Ambiguous { candidates: vec![] });
        report.record(
            4,
            "/d.mkv",
            RecordOutcome::Conflict {
                item_path: "/m/a.mkv".to_string(),
                claimed_by: 1,
            },
        );
        report.record(5, "plugin://x", RecordOutcome::Skipped { reason: "not a file on disk" });

        let s = report.summary();
        assert_eq!(s.written, 1);
        assert_eq!(s.unmatched, 1);
        assert_eq!(s.ambiguous, 2);
        assert_eq!(s.skipped, 1);
        assert_eq!(report.records().len(), 5);
        assert!(!report.has_failures());
        assert_eq!(report.unmatched_paths().collect::<Vec<_>>(), vec!["/b.mkv"]);
    }

    #[test]
    fn test_write_error_is_a_failure() {
        let mut report = Report::new(false);
        report.record(1, "/a.mkv", RecordOutcome::WriteFailed("disk full".to_string()));
        assert!(report.has_failures());
    }

    #[test]
    fn test_detail_line() {
        let entry = RecordReport {
            line: 7,
            kodi_path: "smb://nas/a.mkv".to_string(),
            outcome: written(),
        };

        assert_eq!(
            DetailLine { entry: &entry, dry_run: false }.to_string(),
            "[line 7] WRITTEN: smb://nas/a.mkv -> /m/a.mkv (k)"
        );
        assert_eq!(
            DetailLine { entry: &entry, dry_run: true }.to_string(),
            "[line 7] WOULD WRITE: smb://nas/a.mkv -> /m/a.mkv (k)"
        );
    }
}
