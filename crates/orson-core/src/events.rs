//! Notifications emitted by the simulation for the host UI.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::RunStatus;

/// Change notifications and discrete game events.
///
/// The `*Changed` variants fire only when the observed value differs from the
/// last one published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    ScoreChanged { score: u32 },
    /// Ammo per battery, in fixed battery order.
    AmmoChanged { ammo: Vec<u32> },
    LevelChanged { level: u32 },
    StatusChanged { from: RunStatus, to: RunStatus },
    /// Transient combo banner.
    ComboAchieved { message: String },
    /// A threat struck a battery.
    BatteryHit {
        battery: usize,
        shield_absorbed: bool,
    },
    CityDestroyed { city: usize },
    CityRecovered { city: usize },
    LevelCompleted { level: u32, ammo_bonus: u32 },
}

/// Why a click did not launch a volley.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ShotRejected {
    #[error("run is not in progress")]
    NotPlaying,
    #[error("no surviving battery has ammo")]
    NoEligibleBattery,
    #[error("battery {battery} has {ammo} rounds, volley needs {needed}")]
    InsufficientAmmo {
        battery: usize,
        ammo: u32,
        needed: u32,
    },
}

/// A volley that was launched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volley {
    pub battery: usize,
    /// Ids of the interceptors created, in firing order.
    pub interceptors: Vec<u32>,
    /// Threat id the volley is heat-tracking.
    pub tracking: Option<u32>,
}
