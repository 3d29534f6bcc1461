use crate::domain::config::ArenaConfig;
use crate::domain::geometry::collides_with_any_obstacle;
use crate::domain::state::{Axis, Obstacle, Tank};

/// Moves a tank one step along its body heading, then turns it.
///
/// The candidate position is clamped to the arena, then tried as a full move, an X-only slide and
/// a Y-only slide, in that order; the first one clear of obstacles wins. When all three collide
/// the tank stays put.
pub fn drive_tank(
    tank: &mut Tank,
    forward: Axis,
    turn: Axis,
    cfg: &ArenaConfig,
    obstacles: &[Obstacle],
) {
    if forward != Axis::Neutral {
        let step = forward.sign() * cfg.tank_speed;
        let (x, y) = cfg.clamp_tank_position(
            tank.x + tank.angle.cos() * step,
            tank.y + tank.angle.sin() * step,
        );
        let radius = cfg.tank_radius;

        if !collides_with_any_obstacle(x, y, radius, obstacles) {
            tank.x = x;
            tank.y = y;
        } else if !collides_with_any_obstacle(x, tank.y, radius, obstacles) {
            tank.x = x;
        } else if !collides_with_any_obstacle(tank.x, y, radius, obstacles) {
            tank.y = y;
        }
    }

    tank.angle += turn.sign() * cfg.rotation_speed;
}
