//! Impact resolution: applies damage where a threat landed.

use hecs::World;

use orson_core::components::{Battery, City};
use orson_core::events::Notification;
use orson_core::types::Position;

/// Damage every surviving city and battery inside the tolerance box around
/// `point`. A shielded battery loses its shield instead of being destroyed.
/// Returns true if anything was hit.
pub fn resolve(
    world: &mut World,
    point: Position,
    tolerance: f64,
    notifications: &mut Vec<Notification>,
) -> bool {
    let mut hit = false;

    for (_entity, (pos, city)) in world.query_mut::<(&Position, &mut City)>() {
        if city.destroyed || !pos.within_box(&point, tolerance) {
            continue;
        }
        city.destroyed = true;
        hit = true;
        log::info!("city {} destroyed", city.index);
        notifications.push(Notification::CityDestroyed { city: city.index });
    }

    for (_entity, (pos, battery)) in world.query_mut::<(&Position, &mut Battery)>() {
        if battery.destroyed || !pos.within_box(&point, tolerance) {
            continue;
        }
        hit = true;
        let shield_absorbed = battery.shield_active;
        if shield_absorbed {
            battery.shield_active = false;
            log::info!("battery {} shield absorbed a hit", battery.index);
        } else {
            battery.destroyed = true;
            log::info!("battery {} destroyed", battery.index);
        }
        notifications.push(Notification::BatteryHit {
            battery: battery.index,
            shield_absorbed,
        });
    }

    hit
}
