//! Game configuration surface.
//!
//! `GameConfig::default()` is the reference tuning from `constants`.
//! Hosts may load overrides from JSON; missing fields keep their defaults.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::{Difficulty, SpawnEdges};
use crate::types::Position;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One battery slot in the row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryConfig {
    pub position: Position,
    pub max_ammo: u32,
}

/// Per-preset level tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Threats spawned per level.
    pub quota: u32,
    /// Multiplier applied to threat speed.
    pub speed_multiplier: f64,
}

/// Full tuning surface of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field_width: f64,
    pub field_height: f64,
    pub spawn_margin: f64,
    pub spawn_edges: SpawnEdges,

    pub batteries: Vec<BatteryConfig>,
    pub center_battery: usize,
    pub shielded_battery: Option<usize>,
    pub center_volley_offsets: Vec<f64>,
    pub side_volley_offsets: Vec<f64>,
    pub loss_destroyed_batteries: usize,

    pub cities: Vec<Position>,

    pub interceptor_speed: f64,
    pub explosion_max_radius: f64,
    pub explosion_growth_rate: f64,
    pub threat_base_speed: f64,
    pub threat_speed_per_level: f64,
    pub impact_tolerance: f64,
    pub tracking_radius: f64,

    pub spawn_interval_base: f64,
    pub spawn_interval_per_level: f64,
    pub spawn_interval_min: f64,

    pub win_score: u32,
    pub kill_score: u32,
    pub ammo_bonus_per_round: u32,
    pub level_start_delay: f64,
    pub combo_threshold: u32,
    pub combo_message_duration: f64,

    pub difficulties: HashMap<Difficulty, DifficultyConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let difficulties = [
            (Difficulty::Simple, DIFFICULTY_SIMPLE),
            (Difficulty::Medium, DIFFICULTY_MEDIUM),
            (Difficulty::Hard, DIFFICULTY_HARD),
        ]
        .into_iter()
        .map(|(d, (quota, speed_multiplier))| {
            (
                d,
                DifficultyConfig {
                    quota,
                    speed_multiplier,
                },
            )
        })
        .collect();

        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            spawn_margin: SPAWN_MARGIN,
            spawn_edges: SpawnEdges::default(),
            batteries: BATTERY_LAYOUT
                .iter()
                .map(|&(x, y, max_ammo)| BatteryConfig {
                    position: Position::new(x, y),
                    max_ammo,
                })
                .collect(),
            center_battery: CENTER_BATTERY,
            shielded_battery: Some(SHIELDED_BATTERY),
            center_volley_offsets: CENTER_VOLLEY_OFFSETS.to_vec(),
            side_volley_offsets: SIDE_VOLLEY_OFFSETS.to_vec(),
            loss_destroyed_batteries: LOSS_DESTROYED_BATTERIES,
            cities: CITY_LAYOUT.iter().map(|&p| Position::from(p)).collect(),
            interceptor_speed: INTERCEPTOR_SPEED,
            explosion_max_radius: EXPLOSION_MAX_RADIUS,
            explosion_growth_rate: EXPLOSION_GROWTH_RATE,
            threat_base_speed: THREAT_BASE_SPEED,
            threat_speed_per_level: THREAT_SPEED_PER_LEVEL,
            impact_tolerance: IMPACT_TOLERANCE,
            tracking_radius: TRACKING_RADIUS,
            spawn_interval_base: SPAWN_INTERVAL_BASE,
            spawn_interval_per_level: SPAWN_INTERVAL_PER_LEVEL,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            win_score: WIN_SCORE,
            kill_score: KILL_SCORE,
            ammo_bonus_per_round: AMMO_BONUS_PER_ROUND,
            level_start_delay: LEVEL_START_DELAY,
            combo_threshold: COMBO_THRESHOLD,
            combo_message_duration: COMBO_MESSAGE_DURATION,
            difficulties,
        }
    }
}

impl GameConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Tuning for a difficulty preset. Missing presets fall back to the reference table.
    pub fn difficulty(&self, difficulty: Difficulty) -> DifficultyConfig {
        self.difficulties.get(&difficulty).copied().unwrap_or_else(|| {
            let (quota, speed_multiplier) = match difficulty {
                Difficulty::Simple => DIFFICULTY_SIMPLE,
                Difficulty::Medium => DIFFICULTY_MEDIUM,
                Difficulty::Hard => DIFFICULTY_HARD,
            };
            DifficultyConfig {
                quota,
                speed_multiplier,
            }
        })
    }

    /// Minimum time between spawns at the given level.
    pub fn spawn_interval(&self, level: u32) -> f64 {
        (self.spawn_interval_base - level as f64 * self.spawn_interval_per_level)
            .max(self.spawn_interval_min)
    }

    /// Threat speed before the difficulty multiplier.
    pub fn threat_speed(&self, level: u32) -> f64 {
        self.threat_base_speed + level as f64 * self.threat_speed_per_level
    }

    /// Target-x offsets for a volley from the given battery.
    pub fn volley_offsets(&self, battery: usize) -> &[f64] {
        if battery == self.center_battery {
            &self.center_volley_offsets
        } else {
            &self.side_volley_offsets
        }
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(ConfigError::Invalid("field dimensions must be positive".into()));
        }
        if self.batteries.is_empty() {
            return Err(ConfigError::Invalid("at least one battery is required".into()));
        }
        if self.center_battery >= self.batteries.len() {
            return Err(ConfigError::Invalid(format!(
                "center battery {} out of range ({} batteries)",
                self.center_battery,
                self.batteries.len()
            )));
        }
        if let Some(shielded) = self.shielded_battery {
            if shielded >= self.batteries.len() {
                return Err(ConfigError::Invalid(format!(
                    "shielded battery {shielded} out of range"
                )));
            }
        }
        if self.center_volley_offsets.is_empty() || self.side_volley_offsets.is_empty() {
            return Err(ConfigError::Invalid("volleys need at least one shot".into()));
        }
        if self.interceptor_speed <= 0.0 {
            return Err(ConfigError::Invalid("interceptor speed must be positive".into()));
        }
        if self.explosion_growth_rate <= 0.0 || self.explosion_max_radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "explosion radius and growth rate must be positive".into(),
            ));
        }
        if self.threat_base_speed <= 0.0 {
            return Err(ConfigError::Invalid("threat base speed must be positive".into()));
        }
        if self.win_score == 0 {
            return Err(ConfigError::Invalid("win score must be positive".into()));
        }
        for (difficulty, tuning) in &self.difficulties {
            if tuning.speed_multiplier <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} speed multiplier must be positive",
                    difficulty.as_str()
                )));
            }
        }
        Ok(())
    }
}
