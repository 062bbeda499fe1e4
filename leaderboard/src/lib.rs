#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persisted top-ten leaderboard.
//!
//! The store is a JSON array of `{ "name": string, "score": number }`
//! objects, rewritten wholesale after every accepted score. Reading never
//! fails: a missing, unreadable, or malformed store loads as an empty
//! leaderboard and malformed entries are skipped one by one.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Maximum number of entries kept.
pub const MAX_ENTRIES: usize = 10;

/// Name recorded when a player submits a blank one.
pub const ANONYMOUS: &str = "Anonymous";

/// One ranked row of the leaderboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player name, never blank.
    pub name: String,
    /// Best score observed for the name.
    pub score: u64,
}

/// Failures while persisting the leaderboard.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// The store or its parent directory could not be written.
    #[error("failed writing leaderboard {path}")]
    Io {
        /// Store location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The entries could not be encoded as JSON.
    #[error("failed encoding leaderboard")]
    Encode(#[from] serde_json::Error),
}

/// Ranked, deduplicated, capped score list backed by a JSON file.
#[derive(Debug)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Opens the store at `path`, recovering an empty list from any read failure.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_scores(&path);
        Self { path, entries }
    }

    /// Location of the backing store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the backing store, replacing the in-memory list.
    pub fn reload(&mut self) {
        self.entries = load_scores(&self.path);
    }

    /// Records a score, keeping only the best score per name, then persists.
    ///
    /// The in-memory list is updated even when persisting fails.
    pub fn add_score(&mut self, name: &str, score: u64) -> Result<(), LeaderboardError> {
        let name = if name.trim().is_empty() {
            ANONYMOUS
        } else {
            name
        };
        self.entries.push(LeaderboardEntry {
            name: name.to_owned(),
            score,
        });
        self.entries = rank(std::mem::take(&mut self.entries));
        self.save()
    }

    /// Ranked entries, best first.
    #[must_use]
    pub fn scores(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    fn save(&self) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LeaderboardError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        let encoded = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, encoded).map_err(|source| LeaderboardError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(
            path = %self.path.display(),
            entries = self.entries.len(),
            "leaderboard saved"
        );
        Ok(())
    }
}

/// Reads and normalises the store at `path`.
///
/// Never fails: absent, unreadable, or non-array content yields an empty list.
#[must_use]
pub fn load_scores(path: &Path) -> Vec<LeaderboardEntry> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no leaderboard yet");
            return Vec::new();
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "leaderboard unreadable, starting empty");
            return Vec::new();
        }
    };

    let items = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!(path = %path.display(), "leaderboard is not an array, starting empty");
            return Vec::new();
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "leaderboard is not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let entries = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let entry = parse_entry(item);
            if entry.is_none() {
                warn!(index, "skipping malformed leaderboard entry");
            }
            entry
        })
        .collect();
    rank(entries)
}

fn parse_entry(item: &Value) -> Option<LeaderboardEntry> {
    let object = item.as_object()?;
    let name = object.get("name")?.as_str()?;
    if name.trim().is_empty() {
        return None;
    }
    let score = parse_score(object.get("score")?)?;
    Some(LeaderboardEntry {
        name: name.to_owned(),
        score,
    })
}

/// Integers are taken exactly; fractional scores are truncated.
fn parse_score(value: &Value) -> Option<u64> {
    if let Some(score) = value.as_u64() {
        return Some(score);
    }
    let score = value.as_f64()?;
    if !score.is_finite() || score < 0.0 {
        return None;
    }
    Some(score.trunc() as u64)
}

/// Keeps the best score per name, orders descending, and caps the length.
///
/// Ties keep their first-seen order.
fn rank(entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    let mut best: Vec<LeaderboardEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match best.iter_mut().find(|seen| seen.name == entry.name) {
            Some(seen) => seen.score = seen.score.max(entry.score),
            None => best.push(entry),
        }
    }
    best.sort_by(|a, b| b.score.cmp(&a.score));
    best.truncate(MAX_ENTRIES);
    best
}

/// Game-over facade over the leaderboard.
#[derive(Debug)]
pub struct HighScoreManager {
    leaderboard: Leaderboard,
}

impl HighScoreManager {
    /// Wraps an opened leaderboard.
    #[must_use]
    pub fn new(leaderboard: Leaderboard) -> Self {
        Self { leaderboard }
    }

    /// Opens the leaderboard stored at `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Leaderboard::open(path))
    }

    /// Submits a final score.
    pub fn save_high_score(&mut self, name: &str, score: u64) -> Result<(), LeaderboardError> {
        self.leaderboard.add_score(name, score)
    }

    /// Best score on record, zero when the leaderboard is empty.
    #[must_use]
    pub fn high_score(&self) -> u64 {
        self.leaderboard
            .scores()
            .first()
            .map_or(0, |entry| entry.score)
    }

    /// Ranked entries, best first.
    #[must_use]
    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        self.leaderboard.scores()
    }
}
