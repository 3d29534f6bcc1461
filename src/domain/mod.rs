// Domain layer: core simulation types and rules.

pub mod config;
pub mod geometry;
pub mod ports;
pub mod state;
pub mod systems;

pub use config::{ArenaConfig, TankDimensions};
pub use state::{
    Axis, Bullet, EntityId, Intent, Mine, Obstacle, ObstacleShape, PlayerId, Tank, WorldUpdate,
};
