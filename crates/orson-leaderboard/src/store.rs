//! Score storage backends.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::date;
use crate::entry::{rank, validate_name, LeaderboardEntry, LeaderboardError};

/// Append-only score storage.
pub trait ScoreStore {
    /// Up to `limit` entries, best score first.
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Record a score. The store assigns the id and stamps today's date.
    fn append(&mut self, name: &str, score: u32) -> Result<LeaderboardEntry, LeaderboardError>;
}

/// Persisted board contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Board {
    next_id: u64,
    entries: Vec<LeaderboardEntry>,
}

impl Board {
    fn push(
        &mut self,
        name: &str,
        score: u32,
        date: String,
    ) -> Result<LeaderboardEntry, LeaderboardError> {
        let entry = LeaderboardEntry {
            id: self.next_id + 1,
            name: validate_name(name)?,
            score,
            date,
        };
        self.next_id += 1;
        self.entries.push(entry.clone());
        Ok(entry)
    }

    fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries = self.entries.clone();
        rank(&mut entries);
        entries.truncate(limit);
        entries
    }
}

/// Board held in process memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    board: Board,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.board.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.board.entries.is_empty()
    }
}

impl ScoreStore for MemoryStore {
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.board.top(limit))
    }

    fn append(&mut self, name: &str, score: u32) -> Result<LeaderboardEntry, LeaderboardError> {
        self.board.push(name, score, date::today())
    }
}

/// Board stored as a pretty-printed JSON file, rewritten on every append.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    board: Board,
}

impl JsonFileStore {
    /// Open the board at `path`. A missing file is an empty board.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LeaderboardError> {
        let path = path.into();
        let board = if path.exists() {
            let json = fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            Board::default()
        };
        log::debug!(
            "opened leaderboard {} ({} entries)",
            path.display(),
            board.entries.len()
        );
        Ok(Self { path, board })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), LeaderboardError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.board)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.board.top(limit))
    }

    fn append(&mut self, name: &str, score: u32) -> Result<LeaderboardEntry, LeaderboardError> {
        let mut board = self.board.clone();
        let entry = board.push(name, score, date::today())?;
        let previous = std::mem::replace(&mut self.board, board);
        if let Err(err) = self.save() {
            self.board = previous;
            return Err(err);
        }
        Ok(entry)
    }
}
