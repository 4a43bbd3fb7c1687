//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Outer run status shown by the host UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    /// Title screen. The game has been reset and waits for a start.
    #[default]
    Start,
    /// Simulation steps are running.
    Playing,
    /// Score reached the win threshold.
    Won,
    /// Too many batteries destroyed.
    Lost,
}

impl RunStatus {
    /// Won and Lost end the run; only a return to Start leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Won | RunStatus::Lost)
    }
}

/// Level controller phase, nested inside `RunStatus::Playing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    #[default]
    NotStarted,
    /// Threats are being spawned or are still in flight.
    InProgress,
    /// Level finished; the next one starts after the level delay.
    Ending,
}

/// Difficulty preset. Selects quota and speed multiplier from the difficulty table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Simple,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simple" | "easy" => Some(Difficulty::Simple),
            "medium" | "normal" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Simple => "Simple",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Trajectory shape of a threat.
///
/// Only `Linear` is constructed by the spawner. The curved variants carry
/// their shaping parameters so a future integrator can bend the straight
/// path; until then they travel the same straight line as `Linear`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PathKind {
    #[default]
    Linear,
    /// Lateral sine wobble around the straight path.
    Sine {
        amplitude: f64,
        frequency: f64,
        phase: f64,
    },
    /// Alternating lateral offsets.
    ZigZag { amplitude: f64, frequency: f64 },
    /// Lobbed arc from origin to target.
    Parabolic { apex_height: f64 },
    /// Re-acquires its target every step.
    Homing,
}

/// Where new threats enter the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnEdges {
    /// Above the top edge only.
    TopOnly,
    /// Top, left or right edge, chosen uniformly.
    #[default]
    TopAndSides,
}
