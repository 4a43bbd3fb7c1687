//! Leaderboard client used by the host.

use crate::entry::{validate_name, LeaderboardEntry, LeaderboardError};
use crate::store::{MemoryStore, ScoreStore};
use crate::MAX_ENTRIES;

/// Wraps a [`ScoreStore`] and degrades to an in-memory board when the store
/// fails, so a broken backend never blocks the game.
///
/// Once degraded, the client stays on the in-memory board for the rest of
/// its lifetime and lists only what was submitted after the failure.
pub struct Leaderboard<S: ScoreStore> {
    store: S,
    fallback: MemoryStore,
    degraded: bool,
}

impl<S: ScoreStore> Leaderboard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            fallback: MemoryStore::new(),
            degraded: false,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Best entries, at most [`MAX_ENTRIES`].
    pub fn top(&mut self) -> Vec<LeaderboardEntry> {
        if !self.degraded {
            match self.store.top(MAX_ENTRIES) {
                Ok(entries) => return entries,
                Err(err) => self.degrade(&err),
            }
        }
        self.fallback.top(MAX_ENTRIES).unwrap_or_default()
    }

    /// Submit a final score. Only an invalid submission is reported back;
    /// storage failures switch to the in-memory board.
    pub fn submit(&mut self, name: &str, score: u32) -> Result<LeaderboardEntry, LeaderboardError> {
        let name = validate_name(name)?;

        if !self.degraded {
            match self.store.append(&name, score) {
                Ok(entry) => {
                    log::info!("score {} recorded for {}", entry.score, entry.name);
                    return Ok(entry);
                }
                Err(err) if !err.is_storage() => return Err(err),
                Err(err) => self.degrade(&err),
            }
        }
        self.fallback.append(&name, score)
    }

    fn degrade(&mut self, err: &LeaderboardError) {
        log::warn!("leaderboard store unavailable, keeping scores in memory: {err}");
        self.degraded = true;
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
