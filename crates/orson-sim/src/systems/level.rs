//! Level lifecycle: start, completion check, end-of-level bonus.

use hecs::World;

use orson_core::components::{Battery, City, Explosion, Threat};
use orson_core::config::GameConfig;
use orson_core::enums::{Difficulty, LevelPhase};
use orson_core::events::Notification;

use crate::progress::{ComboState, LevelState};

/// Begin the current level: reset spawning, refill surviving batteries and
/// rebuild destroyed cities that still have their one recovery.
pub fn start_level(
    world: &mut World,
    level: &mut LevelState,
    combo: &mut ComboState,
    config: &GameConfig,
    difficulty: Difficulty,
    notifications: &mut Vec<Notification>,
) {
    let tuning = config.difficulty(difficulty);
    level.phase = LevelPhase::InProgress;
    level.spawned = 0;
    level.quota = tuning.quota;
    level.speed_multiplier = tuning.speed_multiplier;
    combo.reset();

    for (_entity, battery) in world.query_mut::<&mut Battery>() {
        if !battery.destroyed {
            battery.ammo = battery.max_ammo;
        }
    }

    for (_entity, city) in world.query_mut::<&mut City>() {
        if city.destroyed && city.can_recover {
            city.destroyed = false;
            city.can_recover = false;
            log::info!("city {} rebuilt", city.index);
            notifications.push(Notification::CityRecovered { city: city.index });
        }
    }

    log::info!(
        "level {} started: quota={} speed_multiplier={}",
        level.number,
        level.quota,
        level.speed_multiplier
    );
}

/// True once the quota is spawned and nothing dangerous is left on the field.
pub fn level_complete(world: &World, level: &LevelState) -> bool {
    if !level.in_progress() || !level.quota_reached() {
        return false;
    }
    let threats_left = world.query::<&Threat>().iter().any(|(_, t)| t.active);
    let explosions_left = world.query::<&Explosion>().iter().any(|(_, e)| e.active);
    !threats_left && !explosions_left
}

/// Close the level and compute the ammo bonus for unspent rounds in
/// surviving batteries.
pub fn end_level(world: &World, level: &mut LevelState, config: &GameConfig) -> u32 {
    level.phase = LevelPhase::Ending;
    let unspent: u32 = world
        .query::<&Battery>()
        .iter()
        .filter(|(_, b)| !b.destroyed)
        .map(|(_, b)| b.ammo)
        .sum();
    unspent * config.ammo_bonus_per_round
}

pub fn destroyed_batteries(world: &World) -> usize {
    world
        .query::<&Battery>()
        .iter()
        .filter(|(_, b)| b.destroyed)
        .count()
}
