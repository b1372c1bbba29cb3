//! Bounded conversion history, persisted as a JSON array of strings.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum number of entries retained, newest first.
pub const HISTORY_CAP: usize = 10;

/// A most-recent-first log of formatted conversion entries.
///
/// Reads fail soft: a missing or corrupt file is an empty history. Every
/// mutation rewrites the whole array. Concurrent processes sharing the same
/// file are not coordinated; the last write wins.
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<String>,
}

impl HistoryStore {
    /// Opens the store at `path`, loading whatever is persisted there.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        HistoryStore { path, entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Prepends an entry and persists, evicting the oldest beyond the cap.
    pub fn append(&mut self, entry: String) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAP);
        self.persist();
    }

    /// Replaces the in-memory list with the persisted one.
    pub fn reload(&mut self) {
        self.entries = read_entries(&self.path);
    }

    /// Removes the persisted file and empties the in-memory list.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = fs::remove_file(&self.path) {
            debug!("History file not removed: {}", e);
        }
    }

    fn persist(&self) {
        let res = (|| -> anyhow::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, serde_json::to_vec(&self.entries)?)?;
            Ok(())
        })();
        if let Err(e) = res {
            debug!("Failed to persist history: {}", e);
        }
    }
}

fn read_entries(path: &Path) -> Vec<String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!("History read failed, starting empty: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<String>>(&text) {
        Ok(mut entries) => {
            entries.truncate(HISTORY_CAP);
            entries
        }
        Err(e) => {
            debug!("History file corrupt, starting empty: {}", e);
            Vec::new()
        }
    }
}
