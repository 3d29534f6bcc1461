use super::{Hit, HitSource, apply_damage};
use crate::domain::config::ArenaConfig;
use crate::domain::geometry::distance_sq;
use crate::domain::state::{EntityId, Mine, PlayerId, Tank};
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// Lives removed by one mine blast.
const MINE_DAMAGE: u32 = 1;

/// Places a mine under the tank if it is below the per-owner cap and past its placement cooldown.
pub fn place_mine(tank: &mut Tank, id: EntityId, cfg: &ArenaConfig, now: u64) -> Option<Mine> {
    if tank.mines.len() >= cfg.max_mines {
        return None;
    }
    let cooling_down = tank
        .last_mine_at
        .is_some_and(|last| now < last.saturating_add(cfg.mine_cooldown_ms));
    if cooling_down {
        return None;
    }

    tank.mines.push(id);
    tank.last_mine_at = Some(now);
    Some(Mine {
        id,
        owner: tank.id,
        x: tank.x,
        y: tank.y,
        placed_at: now,
        exploded: false,
    })
}

/// Triggers armed mines under active non-owner tanks, then drops exploded mines.
///
/// A blast damages every such tank standing on the mine; the mine is spent once anyone is hit.
pub fn tick_mines(
    mines: &mut Vec<Mine>,
    tanks: &mut BTreeMap<PlayerId, Tank>,
    cfg: &ArenaConfig,
    now: u64,
) -> Vec<Hit> {
    let trigger_radius_sq = cfg.tank_radius * cfg.tank_radius;
    let mut hits = Vec::new();

    for mine in mines.iter_mut() {
        if mine.exploded || now < mine.placed_at.saturating_add(cfg.mine_arm_delay_ms) {
            continue;
        }

        let victims = tanks.values_mut().filter(|t| {
            t.id != mine.owner
                && t.is_active(now)
                && distance_sq(mine.x, mine.y, t.x, t.y) < trigger_radius_sq
        });
        for victim in victims {
            let eliminated = apply_damage(victim, MINE_DAMAGE);
            mine.exploded = true;

            info!(
                victim_id = victim.id,
                owner_id = mine.owner,
                mine_id = mine.id,
                victim_lives = victim.lives,
                "mine exploded"
            );
            hits.push(Hit {
                victim: victim.id,
                attacker: mine.owner,
                source: HitSource::Mine(mine.id),
                lives_left: victim.lives,
                eliminated,
            });
        }
    }

    mines.retain(|m| !m.exploded);
    hits
}

/// Keeps each tank's mine list in step with the mines still on the field.
pub fn prune_owned_mines(mines: &[Mine], tanks: &mut BTreeMap<PlayerId, Tank>) {
    let live: HashSet<EntityId> = mines.iter().map(|m| m.id).collect();
    for tank in tanks.values_mut() {
        tank.mines.retain(|id| live.contains(id));
    }
}
