// Frameworks layer: process bootstrap, runtime configuration and system adapters.

pub mod clock;
pub mod config;
pub mod server;
