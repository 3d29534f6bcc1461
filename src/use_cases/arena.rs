// Authoritative simulation state for one arena and the operations that mutate it.

use crate::domain::systems::movement::drive_tank;
use crate::domain::systems::obstacles::generate_obstacles;
use crate::domain::systems::spawn::find_spawn;
use crate::domain::systems::{Hit, mines, projectiles};
use crate::domain::{
    ArenaConfig, Bullet, EntityId, Intent, Mine, Obstacle, PlayerId, Tank, WorldUpdate,
};
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cooldown drained from every tank per tick, in milliseconds.
pub const COOLDOWN_STEP_MS: u32 = 50;

/// Owns every entity of one arena.
///
/// All mutation goes through `&mut self`, so the caller decides how access is serialized (the
/// server keeps a single instance inside one task). Time is passed in as epoch milliseconds to
/// keep the engine clock-agnostic.
pub struct Arena {
    config: Arc<ArenaConfig>,
    obstacles: Arc<[Obstacle]>,
    // BTreeMap keeps collision order stable (ascending id).
    tanks: BTreeMap<PlayerId, Tank>,
    bullets: Vec<Bullet>,
    mines: Vec<Mine>,
    next_player_id: PlayerId,
    next_entity_id: EntityId,
    tick: u64,
    rng: StdRng,
}

impl Arena {
    /// Creates an arena with a freshly generated obstacle field.
    pub fn new(config: Arc<ArenaConfig>, mut rng: StdRng) -> Self {
        let obstacles = generate_obstacles(
            &mut rng,
            config.map_width,
            config.map_height,
            config.obstacle_count,
        );
        info!(obstacles = obstacles.len(), "obstacle field generated");
        Self::with_obstacles(config, obstacles, rng)
    }

    pub fn with_obstacles(config: Arc<ArenaConfig>, obstacles: Vec<Obstacle>, rng: StdRng) -> Self {
        Self {
            config,
            obstacles: obstacles.into(),
            tanks: BTreeMap::new(),
            bullets: Vec::new(),
            mines: Vec::new(),
            next_player_id: 1,
            next_entity_id: 1,
            tick: 0,
            rng,
        }
    }

    pub fn obstacles(&self) -> &Arc<[Obstacle]> {
        &self.obstacles
    }

    pub fn tank(&self, id: PlayerId) -> Option<&Tank> {
        self.tanks.get(&id)
    }

    pub fn tank_count(&self) -> usize {
        self.tanks.len()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Spawns a new tank away from obstacles and other tanks and returns its id.
    pub fn add_tank(&mut self) -> PlayerId {
        let id = self.next_player_id;
        self.next_player_id += 1;

        let spawn = find_spawn(
            &mut self.rng,
            &self.config,
            &self.obstacles,
            self.tanks.values(),
        );
        if spawn.fallback {
            warn!(player_id = id, "no free spawn found; using arena center");
        }

        self.tanks
            .insert(id, Tank::new(id, spawn.x, spawn.y, self.config.max_lives));
        info!(player_id = id, x = spawn.x, y = spawn.y, "tank spawned");
        id
    }

    /// Removes a tank immediately. Its bullets and mines stay in the world.
    pub fn remove_tank(&mut self, id: PlayerId) -> bool {
        self.tanks.remove(&id).is_some()
    }

    /// Applies one client intent. Returns false when the intent was ignored: unknown tank, no
    /// lives, inside the respawn window, or refused by a cap or cooldown.
    pub fn apply_intent(&mut self, id: PlayerId, intent: Intent, now: u64) -> bool {
        let Some(tank) = self.tanks.get_mut(&id) else {
            return false;
        };
        if !tank.is_active(now) {
            return false;
        }

        match intent {
            Intent::Move {
                forward,
                turn,
                cannon_angle,
            } => {
                drive_tank(tank, forward, turn, &self.config, &self.obstacles);
                if let Some(angle) = cannon_angle {
                    tank.cannon_angle = angle;
                }
                true
            }
            Intent::Aim { angle } => {
                tank.cannon_angle = angle;
                true
            }
            Intent::Shoot => {
                let cooldown = self.config.shoot_cooldown_ms;
                if cooldown > 0 {
                    if tank.cooldown_ms > 0 {
                        return false;
                    }
                    tank.cooldown_ms = cooldown;
                }

                let bullet_id = self.next_entity_id;
                self.next_entity_id += 1;
                self.bullets
                    .push(projectiles::fire_bullet(tank, bullet_id, &self.config));
                true
            }
            Intent::PlaceMine => {
                let mine_id = self.next_entity_id;
                match mines::place_mine(tank, mine_id, &self.config, now) {
                    Some(mine) => {
                        self.next_entity_id += 1;
                        debug!(player_id = id, mine_id, "mine placed");
                        self.mines.push(mine);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Advances the world one tick: bullets, bullet hits, mines, cooldowns, then mine
    /// back-references. Tanks that lose their last life respawn within the same tick.
    pub fn advance_tick(&mut self, now: u64) -> Vec<Hit> {
        self.tick += 1;

        let mut hits = projectiles::tick_bullets(
            &mut self.bullets,
            &mut self.tanks,
            &self.obstacles,
            &self.config,
            now,
        );
        self.respawn_eliminated(&hits, now);

        let mine_hits = mines::tick_mines(&mut self.mines, &mut self.tanks, &self.config, now);
        self.respawn_eliminated(&mine_hits, now);
        hits.extend(mine_hits);

        for tank in self.tanks.values_mut() {
            tank.cooldown_ms = tank.cooldown_ms.saturating_sub(COOLDOWN_STEP_MS);
        }
        mines::prune_owned_mines(&self.mines, &mut self.tanks);

        hits
    }

    pub fn snapshot(&self) -> WorldUpdate {
        WorldUpdate {
            tick: self.tick,
            tanks: self.tanks.values().cloned().collect(),
            bullets: self.bullets.clone(),
            mines: self.mines.clone(),
            map: Arc::clone(&self.obstacles),
        }
    }

    fn respawn_eliminated(&mut self, hits: &[Hit], now: u64) {
        for hit in hits.iter().filter(|h| h.eliminated) {
            self.respawn(hit.victim, now);
        }
    }

    // Same id, new position, full lives, invulnerable for the respawn delay.
    fn respawn(&mut self, id: PlayerId, now: u64) {
        let spawn = find_spawn(
            &mut self.rng,
            &self.config,
            &self.obstacles,
            self.tanks.values(),
        );
        let Some(tank) = self.tanks.get_mut(&id) else {
            return;
        };

        tank.x = spawn.x;
        tank.y = spawn.y;
        tank.lives = self.config.max_lives;
        tank.dead_until = now.saturating_add(self.config.respawn_delay_ms);
        info!(
            player_id = id,
            x = spawn.x,
            y = spawn.y,
            fallback = spawn.fallback,
            dead_until = tank.dead_until,
            "tank respawned"
        );
    }
}
