use super::{Hit, HitSource, apply_damage};
use crate::domain::config::ArenaConfig;
use crate::domain::geometry::{collides_with_any_obstacle, distance_sq};
use crate::domain::state::{Bullet, EntityId, Obstacle, PlayerId, Tank};
use std::collections::BTreeMap;
use tracing::info;

/// Builds a bullet leaving the tank's cannon tip along the cannon heading.
pub fn fire_bullet(tank: &Tank, id: EntityId, cfg: &ArenaConfig) -> Bullet {
    let (x, y) = tank.cannon_tip();
    Bullet {
        id,
        owner: tank.id,
        x,
        y,
        vx: tank.cannon_angle.cos() * cfg.bullet_speed,
        vy: tank.cannon_angle.sin() * cfg.bullet_speed,
        spent: false,
    }
}

/// Advances bullets one tick and resolves them against the world, in order: integrate, drop
/// bullets outside the arena or inside an obstacle, then test the survivors against tanks.
///
/// A bullet hits at most one tank (the first active non-owner in id order). Spent bullets are
/// removed before returning.
pub fn tick_bullets(
    bullets: &mut Vec<Bullet>,
    tanks: &mut BTreeMap<PlayerId, Tank>,
    obstacles: &[Obstacle],
    cfg: &ArenaConfig,
    now: u64,
) -> Vec<Hit> {
    for b in bullets.iter_mut() {
        b.x += b.vx;
        b.y += b.vy;
    }

    bullets.retain(|b| {
        cfg.contains(b.x, b.y) && !collides_with_any_obstacle(b.x, b.y, cfg.bullet_radius, obstacles)
    });

    // Bullet vs tank (naive O(B*T); entity counts are small).
    let hit_radius_sq = cfg.tank_radius * cfg.tank_radius;
    let mut hits = Vec::new();
    for b in bullets.iter_mut() {
        let victim = tanks.values_mut().find(|t| {
            t.id != b.owner
                && t.is_active(now)
                && distance_sq(b.x, b.y, t.x, t.y) < hit_radius_sq
        });
        let Some(victim) = victim else {
            continue;
        };

        let eliminated = apply_damage(victim, cfg.bullet_damage);
        b.spent = true;

        info!(
            victim_id = victim.id,
            shooter_id = b.owner,
            bullet_id = b.id,
            victim_lives = victim.lives,
            "tank hit"
        );
        hits.push(Hit {
            victim: victim.id,
            attacker: b.owner,
            source: HitSource::Bullet(b.id),
            lives_left: victim.lives,
            eliminated,
        });
    }

    bullets.retain(|b| !b.spent);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::ObstacleShape;

    fn cfg() -> ArenaConfig {
        ArenaConfig {
            map_width: 1000.0,
            map_height: 1000.0,
            ..ArenaConfig::default()
        }
    }

    fn bullet(id: EntityId, owner: PlayerId, x: f32, y: f32, vx: f32, vy: f32) -> Bullet {
        Bullet {
            id,
            owner,
            x,
            y,
            vx,
            vy,
            spent: false,
        }
    }

    fn tanks(list: Vec<Tank>) -> BTreeMap<PlayerId, Tank> {
        list.into_iter().map(|t| (t.id, t)).collect()
    }

    #[test]
    fn when_firing_then_bullet_starts_at_cannon_tip_with_cannon_heading() {
        let mut tank = Tank::new(4, 100.0, 100.0, 3);
        tank.cannon_angle = std::f32::consts::FRAC_PI_2;

        let b = fire_bullet(&tank, 9, &cfg());

        assert_eq!(b.owner, 4);
        assert!((b.x - 100.0).abs() < 1e-4);
        assert!((b.y - 140.0).abs() < 1e-4);
        assert!(b.vx.abs() < 1e-4);
        assert!((b.vy - 6.0).abs() < 1e-4);
    }

    #[test]
    fn when_bullet_crosses_right_edge_then_it_is_removed_on_that_tick() {
        let cfg = cfg();
        let mut bullets = vec![bullet(1, 99, 500.0, 500.0, 6.0, 0.0)];
        let mut tanks = BTreeMap::new();

        let mut ticks = 0;
        while !bullets.is_empty() {
            tick_bullets(&mut bullets, &mut tanks, &[], &cfg, 0);
            ticks += 1;
            if !bullets.is_empty() {
                assert!(bullets[0].x <= 1000.0);
            }
        }

        assert_eq!(ticks, (500.0f32 / 6.0).ceil() as u32);
    }

    #[test]
    fn when_bullet_enters_obstacle_then_it_is_dropped_without_hitting() {
        let cfg = cfg();
        let obstacles = [Obstacle {
            id: 1,
            x: 200.0,
            y: 180.0,
            width: 50.0,
            height: 50.0,
            shape: ObstacleShape::Rect,
        }];
        // Bullet edge reaches the wall after one step: 190 + 6 + 6 > 200.
        let mut bullets = vec![bullet(1, 99, 190.0, 200.0, 6.0, 0.0)];
        let mut tanks = BTreeMap::new();

        tick_bullets(&mut bullets, &mut tanks, &obstacles, &cfg, 0);

        assert!(bullets.is_empty());
    }

    #[test]
    fn when_bullet_overlaps_two_tanks_then_only_first_is_hit() {
        let cfg = cfg();
        let mut tanks = tanks(vec![
            Tank::new(1, 100.0, 100.0, 3),
            Tank::new(2, 300.0, 300.0, 3),
            Tank::new(3, 305.0, 300.0, 3),
        ]);
        let mut bullets = vec![bullet(7, 1, 296.0, 300.0, 6.0, 0.0)];

        let hits = tick_bullets(&mut bullets, &mut tanks, &[], &cfg, 0);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].victim, 2);
        assert_eq!(hits[0].source, HitSource::Bullet(7));
        assert_eq!(tanks[&2].lives, 2);
        assert_eq!(tanks[&3].lives, 3);
        assert!(bullets.is_empty());
    }

    #[test]
    fn when_bullet_reaches_its_owner_then_it_passes_through() {
        let cfg = cfg();
        let mut tanks = tanks(vec![Tank::new(1, 300.0, 300.0, 3)]);
        let mut bullets = vec![bullet(7, 1, 294.0, 300.0, 6.0, 0.0)];

        let hits = tick_bullets(&mut bullets, &mut tanks, &[], &cfg, 0);

        assert!(hits.is_empty());
        assert_eq!(tanks[&1].lives, 3);
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn when_target_is_invulnerable_then_bullet_keeps_flying() {
        let cfg = cfg();
        let mut target = Tank::new(2, 300.0, 300.0, 3);
        target.dead_until = 10_000;
        let mut tanks = tanks(vec![target]);
        let mut bullets = vec![bullet(7, 1, 294.0, 300.0, 6.0, 0.0)];

        let hits = tick_bullets(&mut bullets, &mut tanks, &[], &cfg, 9_999);

        assert!(hits.is_empty());
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn when_last_life_is_taken_then_hit_reports_elimination_without_underflow() {
        let cfg = ArenaConfig {
            bullet_damage: 5,
            ..cfg()
        };
        let mut tanks = tanks(vec![Tank::new(2, 300.0, 300.0, 3)]);
        let mut bullets = vec![bullet(7, 1, 294.0, 300.0, 6.0, 0.0)];

        let hits = tick_bullets(&mut bullets, &mut tanks, &[], &cfg, 0);

        assert!(hits[0].eliminated);
        assert_eq!(tanks[&2].lives, 0);
    }
}
