pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::{ConfigError, load_arena_config, parse_arena_config};
pub use frameworks::server::{run, run_with_config};
