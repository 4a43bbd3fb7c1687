//! Entity spawn factories for setting up the simulation world.
//!
//! Creates batteries, cities, threats, interceptors and explosions with
//! their component bundles.

use hecs::World;

use orson_core::components::*;
use orson_core::config::GameConfig;
use orson_core::enums::PathKind;
use orson_core::types::Position;

/// Monotonic id source for threats, interceptors and explosions.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Populate a fresh world with the battery row and the cities.
pub fn setup_game(world: &mut World, config: &GameConfig) {
    spawn_batteries(world, config);
    spawn_cities(world, config);
}

/// Spawn every configured battery with full ammo.
/// Exactly the configured shielded battery starts with its shield up.
pub fn spawn_batteries(world: &mut World, config: &GameConfig) {
    for (index, slot) in config.batteries.iter().enumerate() {
        world.spawn((
            slot.position,
            Battery {
                index,
                ammo: slot.max_ammo,
                max_ammo: slot.max_ammo,
                destroyed: false,
                shield_active: config.shielded_battery == Some(index),
            },
        ));
    }
}

pub fn spawn_cities(world: &mut World, config: &GameConfig) {
    for (index, position) in config.cities.iter().enumerate() {
        world.spawn((
            *position,
            City {
                index,
                destroyed: false,
                can_recover: true,
            },
        ));
    }
}

/// Spawn a straight-line threat at `origin` aimed at `target`.
pub fn spawn_threat(
    world: &mut World,
    ids: &mut IdAllocator,
    origin: Position,
    target: Position,
    speed: f64,
) -> u32 {
    let id = ids.allocate();
    world.spawn((
        origin,
        Threat {
            id,
            origin,
            target,
            speed,
            path: PathKind::Linear,
            active: true,
        },
    ));
    id
}

/// Spawn an interceptor leaving `origin` for `target`.
pub fn spawn_interceptor(
    world: &mut World,
    ids: &mut IdAllocator,
    battery: usize,
    origin: Position,
    target: Position,
    speed: f64,
    tracking: Option<u32>,
) -> u32 {
    let id = ids.allocate();
    world.spawn((
        origin,
        Interceptor {
            id,
            origin,
            target,
            speed,
            progress: 0.0,
            tracking,
            battery,
            active: true,
        },
    ));
    id
}

/// Spawn a zero-radius explosion at `center`.
pub fn spawn_explosion(
    world: &mut World,
    ids: &mut IdAllocator,
    center: Position,
    config: &GameConfig,
) -> u32 {
    let id = ids.allocate();
    world.spawn((
        center,
        Explosion {
            id,
            radius: 0.0,
            max_radius: config.explosion_max_radius,
            growth_rate: config.explosion_growth_rate,
            shrinking: false,
            active: true,
        },
    ));
    id
}

/// Battery components with their positions, in battery order.
pub fn batteries_in_order(world: &World) -> Vec<(Battery, Position)> {
    let mut batteries: Vec<(Battery, Position)> = world
        .query::<(&Battery, &Position)>()
        .iter()
        .map(|(_, (battery, pos))| (battery.clone(), *pos))
        .collect();
    batteries.sort_by_key(|(battery, _)| battery.index);
    batteries
}

/// City components with their positions, in city order.
pub fn cities_in_order(world: &World) -> Vec<(City, Position)> {
    let mut cities: Vec<(City, Position)> = world
        .query::<(&City, &Position)>()
        .iter()
        .map(|(_, (city, pos))| (city.clone(), *pos))
        .collect();
    cities.sort_by_key(|(city, _)| city.index);
    cities
}
