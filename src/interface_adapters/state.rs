use crate::domain::{ArenaConfig, Obstacle};
use crate::use_cases::GameEvent;
use axum::extract::ws::Utf8Bytes;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

#[derive(Clone)]
pub struct AppState {
    // Intents and lifecycle events flowing from connections into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Serialized snapshots, shared across all connections.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized snapshot for lag recovery.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    // Immutable for the life of the process; sent in every init message.
    pub config: Arc<ArenaConfig>,
    pub map: Arc<[Obstacle]>,
}
