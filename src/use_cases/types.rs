// Use-case level inputs/outputs for the game loop.

use crate::domain::{Intent, PlayerId};
use tokio::sync::oneshot;

pub use crate::domain::WorldUpdate;

#[derive(Debug)]
pub enum GameEvent {
    /// Spawns a tank; the world task answers with the allocated id.
    Join { reply: oneshot::Sender<PlayerId> },
    Leave { player_id: PlayerId },
    Intent { player_id: PlayerId, intent: Intent },
}
