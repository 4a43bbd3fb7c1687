//! Run progress data for level, score and combo records.
//!
//! Stored in `SimulationEngine`, NOT as ECS entities.

use serde::{Deserialize, Serialize};

use orson_core::enums::LevelPhase;

/// Per-level spawning state.
#[derive(Debug, Clone)]
pub struct LevelState {
    /// 1-based level number.
    pub number: u32,
    pub phase: LevelPhase,
    /// Threats to spawn this level.
    pub quota: u32,
    pub spawned: u32,
    /// Difficulty multiplier captured when the level started.
    pub speed_multiplier: f64,
    /// Timestamp of the last spawn. Carried across levels.
    pub last_spawn: f64,
}

impl Default for LevelState {
    fn default() -> Self {
        Self {
            number: 1,
            phase: LevelPhase::NotStarted,
            quota: 0,
            spawned: 0,
            speed_multiplier: 1.0,
            last_spawn: 0.0,
        }
    }
}

impl LevelState {
    pub fn in_progress(&self) -> bool {
        self.phase == LevelPhase::InProgress
    }

    pub fn quota_reached(&self) -> bool {
        self.spawned >= self.quota
    }
}

/// Running score state tracked by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u32,
    pub threats_killed: u32,
    pub threats_impacted: u32,
    pub interceptors_fired: u32,
}

/// Consecutive kills without an impact.
#[derive(Debug, Clone, Default)]
pub struct ComboState {
    pub count: u32,
    pub message: Option<ComboMessage>,
}

#[derive(Debug, Clone)]
pub struct ComboMessage {
    pub text: String,
    pub shown_at: f64,
}

impl ComboState {
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Hide the banner once it has been up for `duration`.
    pub fn expire(&mut self, now: f64, duration: f64) {
        if self
            .message
            .as_ref()
            .is_some_and(|m| now - m.shown_at > duration)
        {
            self.message = None;
        }
    }
}

/// Deferred start of the next level.
///
/// Stamped with the run epoch at scheduling time; a reset bumps the epoch so
/// a task left over from a discarded run never fires.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledLevelStart {
    pub fire_at: f64,
    pub epoch: u64,
}
