//! Game state snapshot: the complete visible state handed to the renderer each frame.
//!
//! Snapshots are owned copies; the renderer can never reach back into the simulation.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::Notification;
use crate::types::{Position, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub status: RunStatus,
    pub difficulty: Difficulty,
    pub level: LevelView,
    pub score: u32,
    pub threats: Vec<ThreatView>,
    pub interceptors: Vec<InterceptorView>,
    pub explosions: Vec<ExplosionView>,
    pub batteries: Vec<BatteryView>,
    pub cities: Vec<CityView>,
    pub combo: Option<ComboView>,
    /// Notifications raised since the previous snapshot.
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelView {
    pub number: u32,
    pub phase: LevelPhase,
    pub quota: u32,
    pub spawned: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatView {
    pub id: u32,
    pub position: Position,
    pub origin: Position,
    pub target: Position,
    pub path: PathKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorView {
    pub id: u32,
    pub origin: Position,
    pub position: Position,
    pub target: Position,
    pub progress: f64,
    pub tracking: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionView {
    pub id: u32,
    pub position: Position,
    pub radius: f64,
    pub max_radius: f64,
    pub shrinking: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryView {
    pub index: usize,
    pub position: Position,
    pub ammo: u32,
    pub max_ammo: u32,
    pub destroyed: bool,
    pub shield_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityView {
    pub index: usize,
    pub position: Position,
    pub destroyed: bool,
    pub can_recover: bool,
}

/// Combo banner currently on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboView {
    pub text: String,
    /// Timestamp the banner appeared.
    pub shown_at: f64,
}

impl GameStateSnapshot {
    /// Ammo per battery in fixed battery order.
    pub fn ammo(&self) -> Vec<u32> {
        self.batteries.iter().map(|b| b.ammo).collect()
    }

    pub fn destroyed_batteries(&self) -> usize {
        self.batteries.iter().filter(|b| b.destroyed).count()
    }
}
