//! Click handling: battery selection, ammo accounting and volley launch.

use hecs::World;

use orson_core::components::{Battery, Threat};
use orson_core::config::GameConfig;
use orson_core::events::{ShotRejected, Volley};
use orson_core::types::Position;

use crate::world_setup::{self, IdAllocator};

/// Launch a volley toward `click` from the closest eligible battery.
///
/// The battery is the surviving one with ammo whose x is nearest the click,
/// lowest index on ties. A volley is all-or-nothing: if that battery cannot
/// pay for every shot, nothing is fired and its ammo is untouched.
pub fn fire(
    world: &mut World,
    config: &GameConfig,
    ids: &mut IdAllocator,
    click: Position,
) -> Result<Volley, ShotRejected> {
    let (index, origin) = select_battery(world, click).ok_or(ShotRejected::NoEligibleBattery)?;

    let offsets = config.volley_offsets(index).to_vec();
    let shots = offsets.len() as u32;

    for (_entity, battery) in world.query_mut::<&mut Battery>() {
        if battery.index != index {
            continue;
        }
        if battery.ammo < shots {
            return Err(ShotRejected::InsufficientAmmo {
                battery: index,
                ammo: battery.ammo,
                needed: shots,
            });
        }
        battery.ammo -= shots;
    }

    let tracking = nearest_threat(world, click, config.tracking_radius);

    let interceptors = offsets
        .iter()
        .map(|dx| {
            let target = Position::new(click.x + dx, click.y);
            world_setup::spawn_interceptor(
                world,
                ids,
                index,
                origin,
                target,
                config.interceptor_speed,
                tracking,
            )
        })
        .collect();

    Ok(Volley {
        battery: index,
        interceptors,
        tracking,
    })
}

fn select_battery(world: &World, click: Position) -> Option<(usize, Position)> {
    let mut best: Option<(usize, Position, f64)> = None;
    for (battery, pos) in world_setup::batteries_in_order(world) {
        if battery.destroyed || battery.ammo == 0 {
            continue;
        }
        let dx = (pos.x - click.x).abs();
        if best.map_or(true, |(_, _, d)| dx < d) {
            best = Some((battery.index, pos, dx));
        }
    }
    best.map(|(index, pos, _)| (index, pos))
}

/// Id of the closest active threat strictly within `radius` of `click`.
fn nearest_threat(world: &World, click: Position, radius: f64) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for (_, (threat, pos)) in world.query::<(&Threat, &Position)>().iter() {
        if !threat.active {
            continue;
        }
        let d = pos.distance_to(&click);
        if d < radius && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((threat.id, d));
        }
    }
    best.map(|(id, _)| id)
}
