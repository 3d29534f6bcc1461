// Per-tick simulation rules, each operating on plain entity collections.

pub mod mines;
pub mod movement;
pub mod obstacles;
pub mod projectiles;
pub mod spawn;

use crate::domain::state::{EntityId, PlayerId, Tank};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    Bullet(EntityId),
    Mine(EntityId),
}

/// One resolved hit. `eliminated` is true when the hit took the victim's last life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub victim: PlayerId,
    pub attacker: PlayerId,
    pub source: HitSource,
    pub lives_left: u32,
    pub eliminated: bool,
}

// Shared by bullet and mine resolution.
fn apply_damage(tank: &mut Tank, damage: u32) -> bool {
    tank.lives = tank.lives.saturating_sub(damage);
    tank.lives == 0
}
