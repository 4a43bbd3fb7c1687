//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use orson_core::components::*;
use orson_core::enums::{Difficulty, RunStatus};
use orson_core::events::Notification;
use orson_core::state::*;
use orson_core::types::{Position, SimTime};

use crate::progress::{ComboState, LevelState};
use crate::world_setup::{batteries_in_order, cities_in_order};

/// Run-level values the snapshot needs besides the world.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub status: RunStatus,
    pub difficulty: Difficulty,
    pub level: &'a LevelState,
    pub score: u32,
    pub combo: &'a ComboState,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    ctx: &SnapshotContext<'_>,
    notifications: Vec<Notification>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: ctx.time,
        status: ctx.status,
        difficulty: ctx.difficulty,
        level: LevelView {
            number: ctx.level.number,
            phase: ctx.level.phase,
            quota: ctx.level.quota,
            spawned: ctx.level.spawned,
        },
        score: ctx.score,
        threats: build_threats(world),
        interceptors: build_interceptors(world),
        explosions: build_explosions(world),
        batteries: build_batteries(world),
        cities: build_cities(world),
        combo: ctx.combo.message.as_ref().map(|m| ComboView {
            text: m.text.clone(),
            shown_at: m.shown_at,
        }),
        notifications,
    }
}

fn build_threats(world: &World) -> Vec<ThreatView> {
    let mut threats: Vec<ThreatView> = world
        .query::<(&Threat, &Position)>()
        .iter()
        .filter(|(_, (threat, _))| threat.active)
        .map(|(_, (threat, pos))| ThreatView {
            id: threat.id,
            position: *pos,
            origin: threat.origin,
            target: threat.target,
            path: threat.path,
        })
        .collect();
    threats.sort_by_key(|t| t.id);
    threats
}

fn build_interceptors(world: &World) -> Vec<InterceptorView> {
    let mut interceptors: Vec<InterceptorView> = world
        .query::<(&Interceptor, &Position)>()
        .iter()
        .filter(|(_, (missile, _))| missile.active)
        .map(|(_, (missile, pos))| InterceptorView {
            id: missile.id,
            origin: missile.origin,
            position: *pos,
            target: missile.target,
            progress: missile.progress,
            tracking: missile.tracking,
        })
        .collect();
    interceptors.sort_by_key(|m| m.id);
    interceptors
}

fn build_explosions(world: &World) -> Vec<ExplosionView> {
    let mut explosions: Vec<ExplosionView> = world
        .query::<(&Explosion, &Position)>()
        .iter()
        .filter(|(_, (exp, _))| exp.active)
        .map(|(_, (exp, pos))| ExplosionView {
            id: exp.id,
            position: *pos,
            radius: exp.radius,
            max_radius: exp.max_radius,
            shrinking: exp.shrinking,
        })
        .collect();
    explosions.sort_by_key(|e| e.id);
    explosions
}

fn build_batteries(world: &World) -> Vec<BatteryView> {
    batteries_in_order(world)
        .into_iter()
        .map(|(battery, pos)| BatteryView {
            index: battery.index,
            position: pos,
            ammo: battery.ammo,
            max_ammo: battery.max_ammo,
            destroyed: battery.destroyed,
            shield_active: battery.shield_active,
        })
        .collect()
}

fn build_cities(world: &World) -> Vec<CityView> {
    cities_in_order(world)
        .into_iter()
        .map(|(city, pos)| CityView {
            index: city.index,
            position: pos,
            destroyed: city.destroyed,
            can_recover: city.can_recover,
        })
        .collect()
}
