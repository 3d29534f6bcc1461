// Wire protocol DTOs and conversions for the arena's WebSocket messages.
// Field names follow the browser client (camelCase, ids as strings).

use crate::domain::{
    ArenaConfig, Axis, Bullet, EntityId, Intent, Mine, Obstacle, ObstacleShape, PlayerId, Tank,
    WorldUpdate,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    // Sent once, right after the tank is spawned.
    Init {
        #[serde(rename = "playerId")]
        player_id: String,
        config: ArenaConfigDto,
        map: Vec<ObstacleDto>,
    },
    // Full world snapshot for a given tick.
    State { state: WorldStateDto },
}

impl ServerMessage {
    pub fn init(player_id: PlayerId, config: &ArenaConfig, map: &[Obstacle]) -> Self {
        ServerMessage::Init {
            player_id: player_id.to_string(),
            config: ArenaConfigDto::from(config),
            map: map.iter().map(ObstacleDto::from).collect(),
        }
    }
}

/// Messages the client sends to the server over the WebSocket.
///
/// Any other `type` lands in `Unknown` and is dropped by the gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Move(MoveDto),
    CannonAim(AimDto),
    Shoot,
    Mine,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveDto {
    pub forward: f64,
    pub turn: f64,
    // A cannonAngle that is not a number is treated as absent; the move still applies.
    #[serde(rename = "cannonAngle", default, deserialize_with = "lenient_number")]
    pub cannon_angle: Option<f64>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct AimDto {
    pub angle: f64,
}

fn finite_angle(angle: f64) -> Option<f32> {
    let angle = angle as f32;
    angle.is_finite().then_some(angle)
}

impl ClientMessage {
    /// Range-checks the payload and converts it into a domain intent.
    ///
    /// Returns `None` for `Unknown` and for out-of-range values (axes other than -1/0/1,
    /// a non-finite aim angle). A move with an unusable `cannonAngle` keeps the current angle.
    pub fn into_intent(self) -> Option<Intent> {
        match self {
            ClientMessage::Move(m) => {
                Some(Intent::Move {
                    forward: Axis::from_number(m.forward)?,
                    turn: Axis::from_number(m.turn)?,
                    cannon_angle: m.cannon_angle.and_then(finite_angle),
                })
            }
            ClientMessage::CannonAim(a) => Some(Intent::Aim {
                angle: finite_angle(a.angle)?,
            }),
            ClientMessage::Shoot => Some(Intent::Shoot),
            ClientMessage::Mine => Some(Intent::PlaceMine),
            ClientMessage::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaConfigDto {
    pub map_width: f32,
    pub map_height: f32,
    pub tank_speed: f32,
    pub rotation_speed: f32,
    pub tank_radius: f32,
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub bullet_damage: u32,
    pub max_lives: u32,
    pub respawn_delay: u64,
    pub shoot_cooldown: u32,
    pub max_mines: usize,
    pub mine_cooldown: u64,
    pub mine_explosion_delay: u64,
    pub obstacle_count: usize,
}

impl From<&ArenaConfig> for ArenaConfigDto {
    fn from(cfg: &ArenaConfig) -> Self {
        Self {
            map_width: cfg.map_width,
            map_height: cfg.map_height,
            tank_speed: cfg.tank_speed,
            rotation_speed: cfg.rotation_speed,
            tank_radius: cfg.tank_radius,
            bullet_speed: cfg.bullet_speed,
            bullet_radius: cfg.bullet_radius,
            bullet_damage: cfg.bullet_damage,
            max_lives: cfg.max_lives,
            respawn_delay: cfg.respawn_delay_ms,
            shoot_cooldown: cfg.shoot_cooldown_ms,
            max_mines: cfg.max_mines,
            mine_cooldown: cfg.mine_cooldown_ms,
            mine_explosion_delay: cfg.mine_arm_delay_ms,
            obstacle_count: cfg.obstacle_count,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKindDto {
    Rect,
    Circle,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type")]
    pub kind: ObstacleKindDto,
}

impl From<&Obstacle> for ObstacleDto {
    fn from(o: &Obstacle) -> Self {
        Self {
            id: o.id.to_string(),
            x: o.x,
            y: o.y,
            width: o.width,
            height: o.height,
            kind: match o.shape {
                ObstacleShape::Rect => ObstacleKindDto::Rect,
                ObstacleShape::Circle => ObstacleKindDto::Circle,
            },
        }
    }
}

/// Snapshot of the world sent to clients on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldStateDto {
    pub tick: u64,
    pub players: BTreeMap<String, PlayerDto>,
    pub bullets: Vec<BulletDto>,
    pub mines: Vec<MineDto>,
    pub map: Vec<ObstacleDto>,
}

impl From<WorldUpdate> for WorldStateDto {
    fn from(update: WorldUpdate) -> Self {
        // Players embed full records of the mines they own.
        let by_id: HashMap<EntityId, &Mine> = update.mines.iter().map(|m| (m.id, m)).collect();

        let players = update
            .tanks
            .iter()
            .map(|tank| {
                let owned = tank
                    .mines
                    .iter()
                    .filter_map(|id| by_id.get(id))
                    .map(|m| MineDto::from(*m))
                    .collect();
                (tank.id.to_string(), PlayerDto::new(tank, owned))
            })
            .collect();

        Self {
            tick: update.tick,
            players,
            bullets: update.bullets.iter().map(BulletDto::from).collect(),
            mines: update.mines.iter().map(MineDto::from).collect(),
            map: update.map.iter().map(ObstacleDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub cannon_angle: f32,
    pub lives: u32,
    pub cooldown: u32,
    pub dead_until: u64,
    pub mines: Vec<MineDto>,
    pub body_width: f32,
    pub body_height: f32,
    pub turret_radius: f32,
    pub cannon_length: f32,
    pub cannon_width: f32,
    pub track_width: f32,
    pub track_length: f32,
}

impl PlayerDto {
    fn new(tank: &Tank, mines: Vec<MineDto>) -> Self {
        let dims = tank.dimensions;
        Self {
            id: tank.id.to_string(),
            x: tank.x,
            y: tank.y,
            angle: tank.angle,
            cannon_angle: tank.cannon_angle,
            lives: tank.lives,
            cooldown: tank.cooldown_ms,
            dead_until: tank.dead_until,
            mines,
            body_width: dims.body_width,
            body_height: dims.body_height,
            turret_radius: dims.turret_radius,
            cannon_length: dims.cannon_length,
            cannon_width: dims.cannon_width,
            track_width: dims.track_width,
            track_length: dims.track_length,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub owner: String,
}

impl From<&Bullet> for BulletDto {
    fn from(b: &Bullet) -> Self {
        Self {
            id: b.id.to_string(),
            x: b.x,
            y: b.y,
            vx: b.vx,
            vy: b.vy,
            owner: b.owner.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MineDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub placed_at: u64,
    pub owner: String,
    pub exploded: bool,
}

impl From<&Mine> for MineDto {
    fn from(m: &Mine) -> Self {
        Self {
            id: m.id.to_string(),
            x: m.x,
            y: m.y,
            placed_at: m.placed_at,
            owner: m.owner.to_string(),
            exploded: m.exploded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn parse(text: &str) -> Option<Intent> {
        serde_json::from_str::<ClientMessage>(text)
            .ok()
            .and_then(ClientMessage::into_intent)
    }

    #[test]
    fn when_move_is_well_formed_then_it_becomes_a_move_intent() {
        let intent = parse(r#"{"type":"move","forward":1,"turn":-1,"cannonAngle":0.5}"#);

        assert_eq!(
            intent,
            Some(Intent::Move {
                forward: Axis::Positive,
                turn: Axis::Negative,
                cannon_angle: Some(0.5),
            })
        );
    }

    #[test]
    fn when_move_omits_cannon_angle_then_angle_is_left_alone() {
        let intent = parse(r#"{"type":"move","forward":0,"turn":0}"#);

        assert_eq!(
            intent,
            Some(Intent::Move {
                forward: Axis::Neutral,
                turn: Axis::Neutral,
                cannon_angle: None,
            })
        );
    }

    #[test]
    fn when_cannon_angle_is_not_a_number_then_move_applies_without_it() {
        let expected = Some(Intent::Move {
            forward: Axis::Positive,
            turn: Axis::Neutral,
            cannon_angle: None,
        });

        assert_eq!(
            parse(r#"{"type":"move","forward":1,"turn":0,"cannonAngle":"x"}"#),
            expected
        );
        assert_eq!(
            parse(r#"{"type":"move","forward":1,"turn":0,"cannonAngle":null}"#),
            expected
        );
        assert_eq!(
            parse(r#"{"type":"move","forward":1,"turn":0,"cannonAngle":1e300}"#),
            expected
        );
    }

    #[test]
    fn when_move_is_out_of_range_or_mistyped_then_it_is_dropped() {
        assert_eq!(parse(r#"{"type":"move","forward":3,"turn":0}"#), None);
        assert_eq!(parse(r#"{"type":"move","forward":"1","turn":0}"#), None);
        assert_eq!(parse(r#"{"type":"move","turn":0}"#), None);
    }

    #[test]
    fn when_aim_shoot_and_mine_arrive_then_they_map_to_intents() {
        assert_eq!(
            parse(r#"{"type":"cannonAim","angle":-1.25}"#),
            Some(Intent::Aim { angle: -1.25 })
        );
        assert_eq!(parse(r#"{"type":"shoot"}"#), Some(Intent::Shoot));
        assert_eq!(parse(r#"{"type":"mine","extra":true}"#), Some(Intent::PlaceMine));
    }

    #[test]
    fn when_type_is_unknown_or_payload_is_garbage_then_nothing_is_produced() {
        assert!(matches!(
            serde_json::from_str::<ClientMessage>(r#"{"type":"teleport","x":1}"#),
            Ok(ClientMessage::Unknown)
        ));
        assert_eq!(parse(r#"{"type":"teleport"}"#), None);
        assert_eq!(parse(r#"{"forward":1}"#), None);
        assert_eq!(parse("not json"), None);
    }

    #[test]
    fn when_init_is_serialized_then_it_uses_client_field_names() {
        let cfg = ArenaConfig::default();
        let map = [Obstacle {
            id: 3,
            x: 10.0,
            y: 20.0,
            width: 50.0,
            height: 50.0,
            shape: ObstacleShape::Circle,
        }];

        let value: Value =
            serde_json::to_value(ServerMessage::init(42, &cfg, &map)).expect("serializable");

        assert_eq!(value["type"], "init");
        assert_eq!(value["playerId"], "42");
        assert_eq!(value["config"]["mapWidth"], json!(2000.0));
        assert_eq!(value["config"]["maxLives"], json!(3));
        assert_eq!(value["map"][0]["type"], "circle");
        assert_eq!(value["map"][0]["id"], "3");
    }

    #[test]
    fn when_state_is_serialized_then_players_are_keyed_by_id_with_owned_mines() {
        let mut tank = Tank::new(7, 1.0, 2.0, 3);
        tank.mines.push(11);
        let update = WorldUpdate {
            tick: 5,
            tanks: vec![tank],
            bullets: Vec::new(),
            mines: vec![Mine {
                id: 11,
                owner: 7,
                x: 1.0,
                y: 2.0,
                placed_at: 99,
                exploded: false,
            }],
            map: Arc::from(Vec::new()),
        };

        let msg = ServerMessage::State {
            state: WorldStateDto::from(update),
        };
        let value: Value = serde_json::to_value(msg).expect("serializable");

        assert_eq!(value["type"], "state");
        let player = &value["state"]["players"]["7"];
        assert_eq!(player["cannonAngle"], json!(0.0));
        assert_eq!(player["deadUntil"], json!(0));
        assert_eq!(player["bodyWidth"], json!(60.0));
        assert_eq!(player["mines"][0]["placedAt"], json!(99));
        assert_eq!(value["state"]["mines"][0]["owner"], "7");
        assert_eq!(value["state"]["tick"], json!(5));
    }
}
