//! Explosion lifecycle and explosion-vs-threat collision.

use hecs::World;

use orson_core::components::{Explosion, Threat};
use orson_core::config::GameConfig;
use orson_core::constants::COMBO_MESSAGE_TEXT;
use orson_core::events::Notification;
use orson_core::types::Position;

use crate::progress::{ComboMessage, ComboState, ScoreState};

/// Grow or shrink every explosion, then destroy each active threat that lies
/// strictly inside an active blast. Returns the number of kills.
pub fn run(
    world: &mut World,
    score: &mut ScoreState,
    combo: &mut ComboState,
    config: &GameConfig,
    now: f64,
    notifications: &mut Vec<Notification>,
) -> u32 {
    let blasts = update_explosions(world);
    if blasts.is_empty() {
        return 0;
    }

    let mut kills = 0;
    for (_entity, (pos, threat)) in world.query_mut::<(&Position, &mut Threat)>() {
        if !threat.active {
            continue;
        }
        let hit = blasts
            .iter()
            .any(|(center, radius)| pos.distance_to(center) < *radius);
        if !hit {
            continue;
        }

        threat.active = false;
        kills += 1;
        score.score += config.kill_score;
        score.threats_killed += 1;

        combo.count += 1;
        if combo.count >= config.combo_threshold {
            log::info!("combo x{} at t={now:.0}", combo.count);
            combo.message = Some(ComboMessage {
                text: COMBO_MESSAGE_TEXT.to_string(),
                shown_at: now,
            });
            notifications.push(Notification::ComboAchieved {
                message: COMBO_MESSAGE_TEXT.to_string(),
            });
            combo.count = 0;
        }
    }

    kills
}

/// Advance explosion radii. Returns (center, radius) of every explosion
/// still active after the update.
fn update_explosions(world: &mut World) -> Vec<(Position, f64)> {
    let mut blasts = Vec::new();

    for (_entity, (pos, exp)) in world.query_mut::<(&Position, &mut Explosion)>() {
        if !exp.active {
            continue;
        }
        if !exp.shrinking {
            exp.radius += exp.growth_rate;
            if exp.radius >= exp.max_radius {
                exp.shrinking = true;
            }
        } else {
            exp.radius -= exp.growth_rate;
            if exp.radius <= 0.0 {
                exp.active = false;
                continue;
            }
        }
        blasts.push((*pos, exp.radius));
    }

    blasts
}
