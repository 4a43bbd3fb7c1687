//! Cleanup system: removes entities that have finished their lifecycle.

use hecs::{Entity, World};

use orson_core::components::{Explosion, Interceptor, Threat};

/// Despawn inactive threats, interceptors and explosions.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, threat) in world.query_mut::<&Threat>() {
        if !threat.active {
            despawn_buffer.push(entity);
        }
    }

    for (entity, missile) in world.query_mut::<&Interceptor>() {
        if !missile.active {
            despawn_buffer.push(entity);
        }
    }

    for (entity, explosion) in world.query_mut::<&Explosion>() {
        if !explosion.active {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
