// Use cases layer: the simulation engine and the world task that owns it.

pub mod arena;
pub mod game;
pub mod types;

pub use arena::Arena;
pub use types::{GameEvent, WorldUpdate};
