//! Leaderboard records and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One submitted score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Assigned by the store on append.
    pub id: u64,
    pub name: String,
    pub score: u32,
    /// Submission day as `YYYY-MM-DD` (UTC), stamped by the store.
    pub date: String,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard data is malformed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}

impl LeaderboardError {
    /// Storage failures as opposed to a bad submission.
    pub fn is_storage(&self) -> bool {
        !matches!(self, LeaderboardError::InvalidEntry(_))
    }
}

/// Check a submission before it reaches any store. Returns the trimmed name.
pub fn validate_name(name: &str) -> Result<String, LeaderboardError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LeaderboardError::InvalidEntry("name is empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Sort best first. Equal scores keep submission order.
pub(crate) fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
}
