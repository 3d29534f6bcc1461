use crate::domain::ArenaConfig;
use serde::Deserialize;
use std::{env, fmt, net::IpAddr, path::PathBuf, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("ARENA_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080)
}

pub fn bind_addr() -> IpAddr {
    env::var("ARENA_BIND_ADDR")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(IpAddr::from([0, 0, 0, 0]))
}

pub fn arena_config_path() -> PathBuf {
    env::var("ARENA_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"))
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

pub const TICK_INTERVAL: Duration = Duration::from_millis(33);

// Smallest gap kept between a tank and the arena edge; the arena must fit a tank plus this on
// both sides.
const EDGE_CLEARANCE: f32 = 10.0;

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "failed to read arena config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse arena config: {e}"),
            ConfigError::Invalid(reason) => write!(f, "invalid arena config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// On-disk arena config; keys match the browser client's config object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArenaConfigFile {
    map_width: f32,
    map_height: f32,
    max_lives: u32,
    obstacle_count: usize,

    #[serde(default = "defaults::tank_speed")]
    tank_speed: f32,
    #[serde(default = "defaults::rotation_speed")]
    rotation_speed: f32,
    #[serde(default = "defaults::tank_radius")]
    tank_radius: f32,
    #[serde(default = "defaults::bullet_radius")]
    bullet_radius: f32,
    #[serde(default = "defaults::bullet_speed")]
    bullet_speed: f32,
    #[serde(default = "defaults::bullet_damage")]
    bullet_damage: u32,
    #[serde(default = "defaults::respawn_delay", alias = "respawnCooldown")]
    respawn_delay: u64,
    #[serde(default)]
    shoot_cooldown: u32,
    #[serde(default = "defaults::max_mines")]
    max_mines: usize,
    #[serde(default)]
    mine_cooldown: u64,
    #[serde(default)]
    mine_explosion_delay: u64,
}

mod defaults {
    use crate::domain::ArenaConfig;

    pub fn tank_speed() -> f32 {
        ArenaConfig::default().tank_speed
    }
    pub fn rotation_speed() -> f32 {
        ArenaConfig::default().rotation_speed
    }
    pub fn tank_radius() -> f32 {
        ArenaConfig::default().tank_radius
    }
    pub fn bullet_radius() -> f32 {
        ArenaConfig::default().bullet_radius
    }
    pub fn bullet_speed() -> f32 {
        ArenaConfig::default().bullet_speed
    }
    pub fn bullet_damage() -> u32 {
        ArenaConfig::default().bullet_damage
    }
    pub fn respawn_delay() -> u64 {
        ArenaConfig::default().respawn_delay_ms
    }
    pub fn max_mines() -> usize {
        ArenaConfig::default().max_mines
    }
}

impl From<ArenaConfigFile> for ArenaConfig {
    fn from(file: ArenaConfigFile) -> Self {
        Self {
            map_width: file.map_width,
            map_height: file.map_height,
            tank_speed: file.tank_speed,
            rotation_speed: file.rotation_speed,
            tank_radius: file.tank_radius,
            bullet_speed: file.bullet_speed,
            bullet_radius: file.bullet_radius,
            bullet_damage: file.bullet_damage,
            max_lives: file.max_lives,
            respawn_delay_ms: file.respawn_delay,
            shoot_cooldown_ms: file.shoot_cooldown,
            max_mines: file.max_mines,
            mine_cooldown_ms: file.mine_cooldown,
            mine_arm_delay_ms: file.mine_explosion_delay,
            obstacle_count: file.obstacle_count,
        }
    }
}

pub fn load_arena_config(path: &std::path::Path) -> Result<ArenaConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
    parse_arena_config(&raw)
}

pub fn parse_arena_config(raw: &str) -> Result<ArenaConfig, ConfigError> {
    let file: ArenaConfigFile = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
    let config = ArenaConfig::from(file);
    validate(&config)?;
    Ok(config)
}

fn validate(cfg: &ArenaConfig) -> Result<(), ConfigError> {
    let positive = [
        ("tankSpeed", cfg.tank_speed),
        ("rotationSpeed", cfg.rotation_speed),
        ("tankRadius", cfg.tank_radius),
        ("bulletRadius", cfg.bullet_radius),
        ("bulletSpeed", cfg.bullet_speed),
    ];
    for (name, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{name} must be a finite number > 0, got {value}"
            )));
        }
    }

    let min_side = 2.0 * (cfg.tank_radius + EDGE_CLEARANCE);
    for (name, value) in [("mapWidth", cfg.map_width), ("mapHeight", cfg.map_height)] {
        if !value.is_finite() || value <= min_side {
            return Err(ConfigError::Invalid(format!(
                "{name} must be a finite number > {min_side}, got {value}"
            )));
        }
    }

    if cfg.max_lives == 0 {
        return Err(ConfigError::Invalid("maxLives must be at least 1".into()));
    }

    Ok(())
}
