//! Change-detecting publisher for the values the host UI mirrors.

use orson_core::events::Notification;

/// Remembers the last published score, ammo and level and emits a
/// notification only when one of them differs.
#[derive(Debug, Clone, Default)]
pub struct Publisher {
    score: Option<u32>,
    ammo: Option<Vec<u32>>,
    level: Option<u32>,
}

impl Publisher {
    pub fn publish(&mut self, score: u32, ammo: Vec<u32>, level: u32, out: &mut Vec<Notification>) {
        if self.score != Some(score) {
            self.score = Some(score);
            out.push(Notification::ScoreChanged { score });
        }
        if self.ammo.as_ref() != Some(&ammo) {
            out.push(Notification::AmmoChanged { ammo: ammo.clone() });
            self.ammo = Some(ammo);
        }
        if self.level != Some(level) {
            self.level = Some(level);
            out.push(Notification::LevelChanged { level });
        }
    }
}
