//! Threat spawner. Introduces at most one threat per step while a level runs.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use orson_core::config::GameConfig;
use orson_core::enums::SpawnEdges;
use orson_core::types::Position;

use crate::progress::LevelState;
use crate::world_setup::{self, batteries_in_order, cities_in_order, IdAllocator};

/// Spawn a threat if the level is running, the quota is open and the spawn
/// interval has elapsed. Returns the new threat id.
///
/// With no surviving city or battery to aim at, nothing is spawned and the
/// spawn clock is left untouched.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    level: &mut LevelState,
    config: &GameConfig,
    ids: &mut IdAllocator,
    now: f64,
) -> Option<u32> {
    if !level.in_progress() || level.quota_reached() {
        return None;
    }
    if now - level.last_spawn <= config.spawn_interval(level.number) {
        return None;
    }

    let origin = pick_origin(rng, config);

    let targets = live_targets(world);
    if targets.is_empty() {
        return None;
    }
    let target = targets[rng.gen_range(0..targets.len())];

    let speed = config.threat_speed(level.number) * level.speed_multiplier;
    let id = world_setup::spawn_threat(world, ids, origin, target, speed);

    level.spawned += 1;
    level.last_spawn = now;
    Some(id)
}

/// Entry point just outside the visible field.
fn pick_origin(rng: &mut ChaCha8Rng, config: &GameConfig) -> Position {
    let w = config.field_width;
    let side_band = config.field_height * orson_core::constants::SIDE_SPAWN_HEIGHT_FRACTION;
    let margin = config.spawn_margin;

    let side = match config.spawn_edges {
        SpawnEdges::TopOnly => 0,
        SpawnEdges::TopAndSides => rng.gen_range(0..3),
    };

    match side {
        0 => Position::new(rng.gen::<f64>() * w, -margin),
        1 => Position::new(-margin, rng.gen::<f64>() * side_band),
        _ => Position::new(w + margin, rng.gen::<f64>() * side_band),
    }
}

/// Surviving cities followed by surviving batteries.
fn live_targets(world: &World) -> Vec<Position> {
    let cities = cities_in_order(world)
        .into_iter()
        .filter(|(city, _)| !city.destroyed)
        .map(|(_, pos)| pos);
    let batteries = batteries_in_order(world)
        .into_iter()
        .filter(|(battery, _)| !battery.destroyed)
        .map(|(_, pos)| pos);
    cities.chain(batteries).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orson_core::components::{Battery, City, Threat};
    use orson_core::enums::LevelPhase;
    use rand::SeedableRng;

    fn running_level(quota: u32) -> LevelState {
        LevelState {
            phase: LevelPhase::InProgress,
            quota,
            ..Default::default()
        }
    }

    fn setup() -> (World, GameConfig) {
        let config = GameConfig::default();
        let mut world = World::new();
        world_setup::setup_game(&mut world, &config);
        (world, config)
    }

    #[test]
    fn respects_interval() {
        let (mut world, config) = setup();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ids = IdAllocator::default();
        let mut level = running_level(10);

        // Level 1 interval is 1850; the gap must strictly exceed it.
        assert!(run(&mut world, &mut rng, &mut level, &config, &mut ids, 1850.0).is_none());
        assert!(run(&mut world, &mut rng, &mut level, &config, &mut ids, 1851.0).is_some());
        assert_eq!(level.spawned, 1);
        assert_eq!(level.last_spawn, 1851.0);
        assert!(run(&mut world, &mut rng, &mut level, &config, &mut ids, 3000.0).is_none());
        assert!(run(&mut world, &mut rng, &mut level, &config, &mut ids, 3702.0).is_some());
    }

    #[test]
    fn stops_at_quota_and_when_not_in_progress() {
        let (mut world, config) = setup();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut ids = IdAllocator::default();
        let mut level = running_level(1);

        assert!(run(&mut world, &mut rng, &mut level, &config, &mut ids, 5000.0).is_some());
        assert!(run(&mut world, &mut rng, &mut level, &config, &mut ids, 50_000.0).is_none());

        let mut idle = LevelState::default();
        assert!(run(&mut world, &mut rng, &mut idle, &config, &mut ids, 50_000.0).is_none());
    }

    #[test]
    fn targets_only_surviving_structures() {
        let (mut world, config) = setup();
        for (_, city) in world.query_mut::<&mut City>() {
            city.destroyed = true;
        }
        for (_, battery) in world.query_mut::<&mut Battery>() {
            battery.destroyed = battery.index != 4;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut ids = IdAllocator::default();
        let mut level = running_level(20);
        let mut now = 0.0;
        for _ in 0..20 {
            now += 2000.0;
            run(&mut world, &mut rng, &mut level, &config, &mut ids, now);
        }

        let mut count = 0;
        for (_, threat) in world.query::<&Threat>().iter() {
            assert_eq!(threat.target, Position::new(760.0, 560.0));
            count += 1;
        }
        assert_eq!(count, 20);
    }

    #[test]
    fn no_targets_skips_without_error() {
        let (mut world, config) = setup();
        for (_, city) in world.query_mut::<&mut City>() {
            city.destroyed = true;
        }
        for (_, battery) in world.query_mut::<&mut Battery>() {
            battery.destroyed = true;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut ids = IdAllocator::default();
        let mut level = running_level(5);

        assert!(run(&mut world, &mut rng, &mut level, &config, &mut ids, 9000.0).is_none());
        assert_eq!(level.spawned, 0);
        assert_eq!(level.last_spawn, 0.0);
    }

    #[test]
    fn origins_sit_outside_the_field() {
        let (mut world, config) = setup();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut ids = IdAllocator::default();
        let mut level = running_level(200);
        let mut now = 0.0;
        for _ in 0..200 {
            now += 2000.0;
            run(&mut world, &mut rng, &mut level, &config, &mut ids, now);
        }

        let mut seen = [false; 3];
        for (_, threat) in world.query::<&Threat>().iter() {
            let o = threat.origin;
            if o.y == -20.0 {
                assert!((0.0..800.0).contains(&o.x));
                seen[0] = true;
            } else if o.x == -20.0 {
                assert!((0.0..360.0).contains(&o.y));
                seen[1] = true;
            } else {
                assert_eq!(o.x, 820.0);
                assert!((0.0..360.0).contains(&o.y));
                seen[2] = true;
            }
        }
        assert!(seen.iter().all(|s| *s), "all three edges should be used");
    }

    #[test]
    fn top_only_edges_spawn_above_the_field() {
        let (mut world, mut config) = setup();
        config.spawn_edges = SpawnEdges::TopOnly;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut ids = IdAllocator::default();
        let mut level = running_level(50);
        let mut now = 0.0;
        for _ in 0..50 {
            now += 2000.0;
            run(&mut world, &mut rng, &mut level, &config, &mut ids, now);
        }

        let mut count = 0;
        for (_, threat) in world.query::<&Threat>().iter() {
            assert_eq!(threat.origin.y, -config.spawn_margin);
            assert!((0.0..config.field_width).contains(&threat.origin.x));
            count += 1;
        }
        assert_eq!(count, 50);
    }

    #[test]
    fn speed_scales_with_level_and_multiplier() {
        let (mut world, config) = setup();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut ids = IdAllocator::default();
        let mut level = LevelState {
            number: 4,
            speed_multiplier: 1.3,
            ..running_level(1)
        };
        run(&mut world, &mut rng, &mut level, &config, &mut ids, 10_000.0);

        let speed = world.query::<&Threat>().iter().next().map(|(_, t)| t.speed).unwrap();
        assert!((speed - (0.4 + 4.0 * 0.075) * 1.3).abs() < 1e-12);
    }
}
