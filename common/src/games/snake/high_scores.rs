use serde::{Deserialize, Serialize};

use crate::log;
use crate::storage::KeyValueStore;
use super::types::{BoundaryMode, PlayMode, Skin};

pub const MAX_HIGH_SCORES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Unix epoch milliseconds.
    pub date: i64,
    pub cells: usize,
    pub boundary_mode: BoundaryMode,
    pub skin: Skin,
}

/// Best-first score lists, one per play mode.
pub struct HighScoreLedger<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> HighScoreLedger<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn storage_key(mode: PlayMode) -> String {
        format!("snake.hiscores.{}", mode)
    }

    /// Best first, at most `MAX_HIGH_SCORES`. Unreadable or corrupt lists read as empty.
    pub fn list(&self, mode: PlayMode) -> Vec<HighScoreEntry> {
        let stored = match self.store.get(&Self::storage_key(mode)) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log!("Failed to read {} high scores: {}", mode, e);
                return Vec::new();
            }
        };

        match serde_yaml_ng::from_str(&stored) {
            Ok(mut entries) => {
                rank(&mut entries);
                entries
            }
            Err(e) => {
                log!("Discarding malformed {} high scores: {}", mode, e);
                Vec::new()
            }
        }
    }

    pub fn record(
        &self,
        mode: PlayMode,
        entry: HighScoreEntry,
    ) -> Result<Vec<HighScoreEntry>, String> {
        let mut entries = self.list(mode);
        entries.push(entry);
        rank(&mut entries);

        let serialized = serde_yaml_ng::to_string(&entries)
            .map_err(|e| format!("Failed to serialize high scores: {}", e))?;
        self.store.set(&Self::storage_key(mode), &serialized)?;

        log!("Recorded {} high scores, best is {}", mode, entries[0].score);
        Ok(entries)
    }
}

/// Stable, so equal scores keep their insertion order.
fn rank(entries: &mut Vec<HighScoreEntry>) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_HIGH_SCORES);
}
