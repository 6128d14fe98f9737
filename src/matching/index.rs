//! In-memory lookup from match key to Jellyfin items

use super::normalize::{match_key, normalize, NormalizedPath};
use super::tiebreak::TieBreak;
use crate::model::JellyfinLibraryItem;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct IndexedItem {
    item: JellyfinLibraryItem,
    normalized: NormalizedPath,
}

/// Outcome of looking up one Kodi path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<'a> {
    /// A single item was selected. `candidates > 1` means a tie-break decided.
    Matched {
        item: &'a JellyfinLibraryItem,
        candidates: usize,
    },

    /// No library item carries this file name
    NoMatch,

    /// Several items fit and the tie-break refused to pick
    Ambiguous(Vec<&'a JellyfinLibraryItem>),
}

/// Snapshot of the Jellyfin library keyed by normalized file name
#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    by_key: HashMap<String, Vec<IndexedItem>>,
    ignore_extension: bool,
    item_count: usize,
}

impl LibraryIndex {
    /// Build the index. Items without a usable file name are dropped, and an
    /// item id seen twice under one key is kept once.
    pub fn new<I>(items: I, ignore_extension: bool) -> Self
    where
        I: IntoIterator<Item = JellyfinLibraryItem>,
    {
        let mut index = Self {
            by_key: HashMap::new(),
            ignore_extension,
            item_count: 0,
        };

        for item in items {
            let normalized = normalize(&item.path);
            let Some(key) = match_key(&normalized, ignore_extension) else {
                log::debug!("Ignoring library item without file name: {:?}", item.path);
                continue;
            };

            let bucket = index.by_key.entry(key).or_default();
            if bucket.iter().any(|i| i.item.item_id == item.item_id) {
                continue;
            }

            bucket.push(IndexedItem { item, normalized });
            index.item_count += 1;
        }

        index
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Number of keys shared by more than one item
    pub fn shared_key_count(&self) -> usize {
        self.by_key.values().filter(|items| items.len() > 1).count()
    }

    /// Find the library item for a Kodi path
    pub fn lookup(&self, kodi_path: &str, tie_break: &dyn TieBreak) -> MatchResult<'_> {
        let target = normalize(kodi_path);
        let Some(key) = match_key(&target, self.ignore_extension) else {
            return MatchResult::NoMatch;
        };

        let candidates = match self.by_key.get(&key) {
            Some(candidates) if !candidates.is_empty() => candidates,
            _ => return MatchResult::NoMatch,
        };

        if let [only] = candidates.as_slice() {
            return MatchResult::Matched {
                item: &only.item,
                candidates: 1,
            };
        }

        let paths: Vec<&NormalizedPath> = candidates.iter().map(|c| &c.normalized).collect();
        match tie_break.choose(&target, &paths) {
            Some(winner) if winner < candidates.len() => {
                log::debug!(
                    "{} candidates for {:?}; {} chose {:?}",
                    candidates.len(),
                    kodi_path,
                    tie_break.name(),
                    candidates[winner].item.path
                );
                MatchResult::Matched {
                    item: &candidates[winner].item,
                    candidates: candidates.len(),
                }
            }
            _ => MatchResult::Ambiguous(candidates.iter().map(|c| &c.item).collect()),
        }
    }
}
