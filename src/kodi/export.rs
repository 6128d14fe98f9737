//! Kodi TSV export reader

use super::model::{KodiRow, COLUMN_COUNT, HEADER_MARKER};
use crate::error::InputParseError;
use crate::model::KodiWatchRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One non-blank line of the export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KodiEntry {
    /// A usable watch record
    Record(KodiWatchRecord),

    /// Well-formed but nothing Jellyfin can track
    Skipped {
        line: u64,
        path: String,
        reason: &'static str,
    },

    /// Structurally invalid row
    Invalid(InputParseError),
}

/// Parse a Kodi export file
///
/// Only failing to open or read the file is an error; bad rows come back as
/// [`KodiEntry::Invalid`].
pub fn parse_export(path: &Path) -> Result<Vec<KodiEntry>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open Kodi export: {:?}", path))?;

    parse_export_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read Kodi export: {:?}", path))
}

/// Parse a Kodi export from any reader
pub fn parse_export_reader<R: Read>(input: R) -> Result<Vec<KodiEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(input);

    let mut entries = Vec::new();
    let mut first = true;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(e.into());
                }
                entries.push(KodiEntry::Invalid(InputParseError::Malformed {
                    line,
                    message: e.to_string(),
                }));
                first = false;
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        if first {
            first = false;
            if record.get(0) == Some(HEADER_MARKER) {
                log::debug!("Skipping header line");
                continue;
            }
        }

        if record.len() != COLUMN_COUNT {
            entries.push(KodiEntry::Invalid(InputParseError::ColumnCount {
                line,
                found: record.len(),
            }));
            continue;
        }

        let row: KodiRow = match record.deserialize(None) {
            Ok(row) => row,
            Err(e) => {
                entries.push(KodiEntry::Invalid(InputParseError::Malformed {
                    line,
                    message: e.to_string(),
                }));
                continue;
            }
        };

        entries.push(parse_row(line, row));
    }

    log::debug!("Read {} entries from Kodi export", entries.len());
    Ok(entries)
}

fn parse_row(line: u64, row: KodiRow) -> KodiEntry {
    if let Some(reason) = row.unsupported_reason() {
        return KodiEntry::Skipped {
            line,
            path: format!("{}{}", row.str_path, row.str_file_name),
            reason,
        };
    }

    let Ok(last_played) = row.parse_last_played() else {
        return KodiEntry::Invalid(InputParseError::Timestamp {
            line,
            value: row.last_played,
        });
    };

    let Some(play_count) = row.parse_play_count() else {
        return KodiEntry::Invalid(InputParseError::PlayCount {
            line,
            value: row.play_count,
        });
    };

    KodiEntry::Record(KodiWatchRecord {
        line,
        directory_path: row.str_path,
        file_name: row.str_file_name,
        last_played,
        play_count,
    })
}
