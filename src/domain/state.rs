// Domain-level simulation entities, intents and the per-tick snapshot.

use crate::domain::config::TankDimensions;
use std::sync::Arc;

pub type PlayerId = u64;
pub type EntityId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleShape {
    Rect,
    Circle,
}

/// Static arena geometry. Circles are stored as their bounding box (`width == height`).
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub shape: ObstacleShape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    /// Body heading in radians; drives movement.
    pub angle: f32,
    /// Turret heading in radians; drives fire direction.
    pub cannon_angle: f32,

    // Combat state.
    pub lives: u32,
    pub cooldown_ms: u32,
    /// Epoch millis until which the tank ignores intents and collisions.
    pub dead_until: u64,

    /// Ids of mines this tank has on the field (back-reference into the arena's mine list).
    pub mines: Vec<EntityId>,
    pub last_mine_at: Option<u64>,

    pub dimensions: TankDimensions,
}

impl Tank {
    pub fn new(id: PlayerId, x: f32, y: f32, lives: u32) -> Self {
        Self {
            id,
            x,
            y,
            angle: 0.0,
            cannon_angle: 0.0,
            lives,
            cooldown_ms: 0,
            dead_until: 0,
            mines: Vec::new(),
            last_mine_at: None,
            dimensions: TankDimensions::default(),
        }
    }

    pub fn is_invulnerable(&self, now: u64) -> bool {
        now < self.dead_until
    }

    /// True when the tank may act and be hit.
    pub fn is_active(&self, now: u64) -> bool {
        self.lives > 0 && !self.is_invulnerable(now)
    }

    pub fn cannon_tip(&self) -> (f32, f32) {
        let len = self.dimensions.cannon_length;
        (
            self.x + self.cannon_angle.cos() * len,
            self.y + self.cannon_angle.sin() * len,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: EntityId,
    pub owner: PlayerId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Set on the first tank hit; spent bullets are dropped before the tick ends.
    pub spent: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mine {
    pub id: EntityId,
    pub owner: PlayerId,
    pub x: f32,
    pub y: f32,
    pub placed_at: u64,
    pub exploded: bool,
}

/// Discrete steering input: -1, 0 or +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Negative,
    Neutral,
    Positive,
}

impl Axis {
    /// Accepts exactly -1, 0 or 1.
    pub fn from_number(value: f64) -> Option<Self> {
        if value == -1.0 {
            Some(Axis::Negative)
        } else if value == 0.0 {
            Some(Axis::Neutral)
        } else if value == 1.0 {
            Some(Axis::Positive)
        } else {
            None
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Axis::Negative => -1.0,
            Axis::Neutral => 0.0,
            Axis::Positive => 1.0,
        }
    }
}

/// A validated client request to change one tank's state.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Move {
        forward: Axis,
        turn: Axis,
        cannon_angle: Option<f32>,
    },
    Aim {
        angle: f32,
    },
    Shoot,
    PlaceMine,
}

/// Full world state after a tick.
#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub tanks: Vec<Tank>,
    pub bullets: Vec<Bullet>,
    pub mines: Vec<Mine>,
    pub map: Arc<[Obstacle]>,
}
