//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components. `Position` (from `types`)
//! is attached alongside each of these as the entity's current location.

use serde::{Deserialize, Serialize};

use crate::enums::PathKind;
use crate::types::Position;

/// Incoming enemy projectile heading for a city or battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Threat {
    /// Run-unique identifier.
    pub id: u32,
    /// Entry point just outside the field.
    pub origin: Position,
    /// Aim point, captured at spawn time and never updated.
    pub target: Position,
    /// Field units per step.
    pub speed: f64,
    pub path: PathKind,
    pub active: bool,
}

/// Player-fired projectile that detonates at its target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interceptor {
    pub id: u32,
    /// Launching battery position.
    pub origin: Position,
    /// Detonation point. Follows the tracked threat while it lives.
    pub target: Position,
    /// Field units per step along the origin→target segment.
    pub speed: f64,
    /// Fraction of the segment covered, 0.0..=1.0.
    pub progress: f64,
    /// Threat id this interceptor is heat-tracking.
    pub tracking: Option<u32>,
    /// Battery index that fired it.
    pub battery: usize,
    pub active: bool,
}

/// Growing-then-shrinking kill zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub radius: f64,
    pub max_radius: f64,
    /// Radius change per step, both while growing and shrinking.
    pub growth_rate: f64,
    pub shrinking: bool,
    pub active: bool,
}

/// Player launch site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battery {
    /// Fixed slot in the battery row (left to right).
    pub index: usize,
    pub ammo: u32,
    pub max_ammo: u32,
    pub destroyed: bool,
    /// One-hit shield. Persists across levels until consumed.
    pub shield_active: bool,
}

/// Protected structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub index: usize,
    pub destroyed: bool,
    /// A destroyed city is rebuilt at most once per game.
    pub can_recover: bool,
}
