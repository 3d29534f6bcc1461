// Network adapter for player WebSocket connections.

pub mod client;

pub use client::{spawn_world_serializer, ws_handler};
