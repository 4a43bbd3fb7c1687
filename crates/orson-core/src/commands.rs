//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::Difficulty;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Leave the title screen and begin playing.
    StartMission,
    /// Return to the title screen. Resets the whole game.
    ReturnToMenu,
    /// Choose the difficulty preset (title screen only).
    SetDifficulty { difficulty: Difficulty },
    /// Pointer click at field coordinates.
    Fire { x: f64, y: f64 },
}
