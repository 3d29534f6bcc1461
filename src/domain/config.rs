/// Gameplay tuning for one arena.
///
/// Built once at startup and shared read-only with the engine. Keep this separate from
/// runtime/server configuration (tick rates, buffer sizes, etc.).
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Arena width in world units.
    pub map_width: f32,
    /// Arena height in world units.
    pub map_height: f32,

    /// Distance a tank travels per accepted `move` intent.
    pub tank_speed: f32,
    /// Body rotation in radians per accepted `move` intent.
    pub rotation_speed: f32,
    /// Tank collision radius (obstacles, bounds, hits, spawn spacing).
    pub tank_radius: f32,

    /// Bullet travel per tick.
    pub bullet_speed: f32,
    /// Bullet collision radius against obstacles.
    pub bullet_radius: f32,
    /// Lives removed per bullet hit.
    pub bullet_damage: u32,

    pub max_lives: u32,
    /// Invulnerability window after a respawn, in milliseconds.
    pub respawn_delay_ms: u64,
    /// Minimum time between two shots; 0 leaves shooting ungated.
    pub shoot_cooldown_ms: u32,

    /// Mines a single tank may have on the field at once.
    pub max_mines: usize,
    /// Minimum time between two mine placements by the same tank.
    pub mine_cooldown_ms: u64,
    /// Time after placement before a mine can trigger.
    pub mine_arm_delay_ms: u64,

    pub obstacle_count: usize,
}

impl ArenaConfig {
    /// Arena midpoint, also the spawn fallback.
    pub fn center(&self) -> (f32, f32) {
        (self.map_width / 2.0, self.map_height / 2.0)
    }

    /// Clamps a point so a tank centred on it stays fully inside the arena.
    pub fn clamp_tank_position(&self, x: f32, y: f32) -> (f32, f32) {
        let r = self.tank_radius;
        (
            x.clamp(r, self.map_width - r),
            y.clamp(r, self.map_height - r),
        )
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.map_width).contains(&x) && (0.0..=self.map_height).contains(&y)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            map_width: 2000.0,
            map_height: 2000.0,
            tank_speed: 2.0,
            rotation_speed: 0.05,
            tank_radius: 20.0,
            bullet_speed: 6.0,
            bullet_radius: 6.0,
            bullet_damage: 1,
            max_lives: 3,
            respawn_delay_ms: 3000,
            shoot_cooldown_ms: 0,
            max_mines: 2,
            mine_cooldown_ms: 0,
            mine_arm_delay_ms: 0,
            obstacle_count: 20,
        }
    }
}

/// Fixed tank body measurements, sent to clients for drawing.
///
/// Only `cannon_length` matters to the simulation (bullets leave from the cannon tip).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankDimensions {
    pub body_width: f32,
    pub body_height: f32,
    pub turret_radius: f32,
    pub cannon_length: f32,
    pub cannon_width: f32,
    pub track_width: f32,
    pub track_length: f32,
}

impl Default for TankDimensions {
    fn default() -> Self {
        Self {
            body_width: 60.0,
            body_height: 40.0,
            turret_radius: 20.0,
            cannon_length: 40.0,
            cannon_width: 8.0,
            track_width: 8.0,
            track_length: 70.0,
        }
    }
}
