// Point-plus-radius overlap tests against static obstacles.

use crate::domain::state::{Obstacle, ObstacleShape};

pub fn distance_sq(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// True if a circle of `radius` at (x, y) overlaps the obstacle's rectangle, treating the radius
/// as padding on every side.
pub fn overlaps_rect(x: f32, y: f32, radius: f32, obstacle: &Obstacle) -> bool {
    x + radius > obstacle.x
        && x - radius < obstacle.x + obstacle.width
        && y + radius > obstacle.y
        && y - radius < obstacle.y + obstacle.height
}

/// True if a circle of `radius` at (x, y) overlaps the obstacle's inscribed circle.
pub fn overlaps_circle(x: f32, y: f32, radius: f32, obstacle: &Obstacle) -> bool {
    let obstacle_radius = obstacle.width / 2.0;
    let cx = obstacle.x + obstacle_radius;
    let cy = obstacle.y + obstacle_radius;
    let reach = radius + obstacle_radius;
    distance_sq(x, y, cx, cy) < reach * reach
}

fn outside_padded_bounds(x: f32, y: f32, radius: f32, obstacle: &Obstacle) -> bool {
    x < obstacle.x - radius
        || x > obstacle.x + obstacle.width + radius
        || y < obstacle.y - radius
        || y > obstacle.y + obstacle.height + radius
}

pub fn collides_with(x: f32, y: f32, radius: f32, obstacle: &Obstacle) -> bool {
    match obstacle.shape {
        ObstacleShape::Rect => overlaps_rect(x, y, radius, obstacle),
        ObstacleShape::Circle => overlaps_circle(x, y, radius, obstacle),
    }
}

/// Returns on the first obstacle hit, in storage order.
pub fn collides_with_any_obstacle(x: f32, y: f32, radius: f32, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|obstacle| {
        // Cheap bounding-box reject before the precise shape test.
        !outside_padded_bounds(x, y, radius, obstacle) && collides_with(x, y, radius, obstacle)
    })
}
