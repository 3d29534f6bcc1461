// Spawn placement via bounded rejection sampling.

use crate::domain::config::ArenaConfig;
use crate::domain::geometry::{collides_with_any_obstacle, distance_sq};
use crate::domain::state::{Obstacle, Tank};
use rand::Rng;

pub const MAX_SPAWN_ATTEMPTS: usize = 50;
/// Extra clearance from the arena walls on top of the tank radius.
const WALL_CLEARANCE: f32 = 10.0;
/// Live tanks closer than this many radii reject a candidate.
const SPACING_RADII: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    /// True when every attempt failed and the arena center was used.
    pub fallback: bool,
}

/// Finds a position clear of obstacles and at least `3 * tank_radius` from every tank with lives
/// left. Falls back to the arena center after `MAX_SPAWN_ATTEMPTS` rejected samples; the center
/// is not checked.
pub fn find_spawn<'a, R, I>(
    rng: &mut R,
    cfg: &ArenaConfig,
    obstacles: &[Obstacle],
    tanks: I,
) -> SpawnPoint
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a Tank>,
{
    let radius = cfg.tank_radius;
    let margin = radius + WALL_CLEARANCE;
    let min_spacing = radius * SPACING_RADII;
    let min_spacing_sq = min_spacing * min_spacing;

    let live: Vec<(f32, f32)> = tanks
        .into_iter()
        .filter(|t| t.lives > 0)
        .map(|t| (t.x, t.y))
        .collect();

    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let x = margin + rng.random::<f32>() * (cfg.map_width - 2.0 * margin);
        let y = margin + rng.random::<f32>() * (cfg.map_height - 2.0 * margin);

        if collides_with_any_obstacle(x, y, radius, obstacles) {
            continue;
        }
        if live
            .iter()
            .any(|&(ox, oy)| distance_sq(x, y, ox, oy) < min_spacing_sq)
        {
            continue;
        }
        return SpawnPoint {
            x,
            y,
            fallback: false,
        };
    }

    let (x, y) = cfg.center();
    SpawnPoint {
        x,
        y,
        fallback: true,
    }
}
