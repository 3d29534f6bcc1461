// Obstacle field generation: one obstacle per grid cell, no rejection loop.

use crate::domain::state::{Obstacle, ObstacleShape};
use rand::Rng;

/// Gap kept between an obstacle and its cell boundary.
const CELL_MARGIN: f32 = 10.0;

const RECT_SIDE_MIN: f32 = 60.0;
const RECT_SIDE_SPAN: f32 = 80.0;
const CIRCLE_DIAMETER_MIN: f32 = 40.0;
const CIRCLE_DIAMETER_SPAN: f32 = 40.0;

/// Lays out `count` obstacles over a near-square grid in row-major order.
///
/// Obstacles may overlap each other; only the cell boundaries are respected. When a sampled size
/// does not fit its cell the position is clamped to the cell's minimum corner instead of
/// resampling.
pub fn generate_obstacles<R: Rng + ?Sized>(
    rng: &mut R,
    map_width: f32,
    map_height: f32,
    count: usize,
) -> Vec<Obstacle> {
    if count == 0 {
        return Vec::new();
    }

    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    let cell_width = map_width / cols as f32;
    let cell_height = map_height / rows as f32;

    let mut obstacles = Vec::with_capacity(count);
    'grid: for row in 0..rows {
        for col in 0..cols {
            if obstacles.len() >= count {
                break 'grid;
            }

            let shape = if rng.random_bool(0.5) {
                ObstacleShape::Rect
            } else {
                ObstacleShape::Circle
            };
            let (width, height) = match shape {
                ObstacleShape::Rect => (
                    RECT_SIDE_MIN + rng.random::<f32>() * RECT_SIDE_SPAN,
                    RECT_SIDE_MIN + rng.random::<f32>() * RECT_SIDE_SPAN,
                ),
                ObstacleShape::Circle => {
                    let diameter = CIRCLE_DIAMETER_MIN + rng.random::<f32>() * CIRCLE_DIAMETER_SPAN;
                    (diameter, diameter)
                }
            };

            let min_x = col as f32 * cell_width + CELL_MARGIN;
            let max_x = (col + 1) as f32 * cell_width - width - CELL_MARGIN;
            let min_y = row as f32 * cell_height + CELL_MARGIN;
            let max_y = (row + 1) as f32 * cell_height - height - CELL_MARGIN;

            obstacles.push(Obstacle {
                id: obstacles.len() as u64 + 1,
                x: sample_in(rng, min_x, max_x),
                y: sample_in(rng, min_y, max_y),
                width,
                height,
                shape,
            });
        }
    }

    obstacles
}

// Degenerate ranges (max < min) collapse onto `min`.
fn sample_in<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let sampled = min + rng.random::<f32>() * (max - min);
    sampled.min(max).max(min)
}
