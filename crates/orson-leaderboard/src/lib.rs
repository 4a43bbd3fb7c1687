//! Score leaderboard for Orson Cyber War.
//!
//! Lives outside the simulation: the host submits a final score after a run
//! ends and lists the best results. Storage sits behind [`ScoreStore`];
//! [`Leaderboard`] keeps working in memory when the store fails.

pub mod client;
pub mod date;
pub mod entry;
pub mod store;

pub use client::Leaderboard;
pub use entry::{LeaderboardEntry, LeaderboardError};
pub use store::{JsonFileStore, MemoryStore, ScoreStore};

/// Number of entries shown on the board.
pub const MAX_ENTRIES: usize = 10;
