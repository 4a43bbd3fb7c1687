//! Motion integration for threats and interceptors.
//!
//! Threats close on their fixed aim point at constant speed. Interceptors
//! advance a progress fraction along the segment from their launch point to
//! a target that follows the tracked threat.

use std::collections::HashMap;

use glam::DVec2;
use hecs::World;

use orson_core::components::{Interceptor, Threat};
use orson_core::config::GameConfig;
use orson_core::enums::PathKind;
use orson_core::types::Position;

use crate::world_setup::{self, IdAllocator};

/// A threat that reached its aim point this step.
#[derive(Debug, Clone, Copy)]
pub struct Arrival {
    pub threat_id: u32,
    pub point: Position,
}

enum Step {
    Moved(Position),
    Arrived,
}

/// Advance every active threat. Threats that arrive are deactivated and
/// returned so the impact resolver can apply damage.
pub fn advance_threats(world: &mut World) -> Vec<Arrival> {
    let mut arrivals = Vec::new();

    for (_entity, (pos, threat)) in world.query_mut::<(&mut Position, &mut Threat)>() {
        if !threat.active {
            continue;
        }
        match step_threat(threat, *pos) {
            Step::Moved(next) => *pos = next,
            Step::Arrived => {
                threat.active = false;
                arrivals.push(Arrival {
                    threat_id: threat.id,
                    point: threat.target,
                });
            }
        }
    }

    arrivals
}

fn step_threat(threat: &Threat, pos: Position) -> Step {
    match threat.path {
        PathKind::Linear => step_linear(pos, threat.target, threat.speed),
        // Curved paths have no integrator of their own yet.
        PathKind::Sine { .. }
        | PathKind::ZigZag { .. }
        | PathKind::Parabolic { .. }
        | PathKind::Homing => step_linear(pos, threat.target, threat.speed),
    }
}

fn step_linear(pos: Position, target: Position, speed: f64) -> Step {
    let from: DVec2 = pos.to_vec();
    let delta = target.to_vec() - from;
    let dist = delta.length();
    if dist < speed {
        Step::Arrived
    } else {
        Step::Moved(Position::from_vec(from + delta / dist * speed))
    }
}

/// Advance every active interceptor, retargeting heat-tracking ones onto
/// their threat first. Interceptors that complete their segment detonate.
/// Returns the ids of the explosions created.
pub fn advance_interceptors(
    world: &mut World,
    config: &GameConfig,
    ids: &mut IdAllocator,
) -> Vec<u32> {
    let live_threats: HashMap<u32, Position> = world
        .query::<(&Threat, &Position)>()
        .iter()
        .filter(|(_, (threat, _))| threat.active)
        .map(|(_, (threat, pos))| (threat.id, *pos))
        .collect();

    let mut detonations: Vec<Position> = Vec::new();

    for (_entity, (pos, missile)) in world.query_mut::<(&mut Position, &mut Interceptor)>() {
        if !missile.active {
            continue;
        }

        if let Some(target) = missile.tracking.and_then(|id| live_threats.get(&id)) {
            missile.target = *target;
        }

        // Segment length is measured from the launch point to the current
        // target, so retargeting changes the per-step increment.
        let segment = missile.target.to_vec() - missile.origin.to_vec();
        let total = segment.length();
        if total <= f64::EPSILON {
            missile.progress = 1.0;
        } else {
            missile.progress += missile.speed / total;
        }

        if missile.progress >= 1.0 {
            missile.active = false;
            detonations.push(missile.target);
        } else {
            *pos = Position::from_vec(missile.origin.to_vec() + segment * missile.progress);
        }
    }

    detonations
        .into_iter()
        .map(|center| world_setup::spawn_explosion(world, ids, center, config))
        .collect()
}
