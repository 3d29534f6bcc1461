use super::arena::Arena;
use super::types::{GameEvent, WorldUpdate};
use crate::domain::ports::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Single writer for the arena.
///
/// Events are applied as they arrive. On every tick, events still queued are drained first so a
/// `Leave` sent before the tick never shows up in that tick's snapshot; then the world advances
/// and the snapshot is broadcast.
pub async fn world_task(
    mut arena: Arena,
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(tick = arena.tick(), "world task shutting down");
                break;
            }
            event = input_rx.recv() => {
                let Some(event) = event else {
                    info!("input channel closed; world task exiting");
                    break;
                };
                handle_event(&mut arena, event, clock.now_millis());
            }
            _ = interval.tick() => {
                while let Ok(event) = input_rx.try_recv() {
                    handle_event(&mut arena, event, clock.now_millis());
                }

                let hits = arena.advance_tick(clock.now_millis());
                for hit in &hits {
                    debug!(
                        tick = arena.tick(),
                        victim_id = hit.victim,
                        attacker_id = hit.attacker,
                        source = ?hit.source,
                        lives_left = hit.lives_left,
                        eliminated = hit.eliminated,
                        "hit resolved"
                    );
                }
                // No receivers just means nobody is connected.
                let _ = world_tx.send(arena.snapshot());
            }
        }
    }
}

fn handle_event(arena: &mut Arena, event: GameEvent, now: u64) {
    match event {
        GameEvent::Join { reply } => {
            let player_id = arena.add_tank();
            info!(player_id, players = arena.tank_count(), "player joined");
            if reply.send(player_id).is_err() {
                // The connection went away while waiting; don't leave an orphan tank.
                arena.remove_tank(player_id);
                info!(player_id, "join abandoned; tank removed");
            }
        }
        GameEvent::Leave { player_id } => {
            if arena.remove_tank(player_id) {
                info!(player_id, players = arena.tank_count(), "player left");
            }
        }
        GameEvent::Intent { player_id, intent } => {
            arena.apply_intent(player_id, intent, now);
        }
    }
}
