// Framework bootstrap for the arena server runtime.

use crate::domain::ArenaConfig;
use crate::frameworks::clock::SystemClock;
use crate::frameworks::config;
use crate::interface_adapters::net::{spawn_world_serializer, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{Arena, GameEvent, WorldUpdate, game::world_task};

use axum::{Router, extract::ws::Utf8Bytes, routing::get};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::{Notify, broadcast, mpsc, watch};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves the arena on `listener` until the process is interrupted.
pub async fn run(listener: tokio::net::TcpListener, arena_config: Arc<ArenaConfig>) -> Result<()> {
    let address = listener.local_addr()?;

    // input_tx/rx: every connection's intents go to the single world task.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);
    // world_tx: snapshots, one per tick.
    let (world_tx, _world_rx) = broadcast::channel::<WorldUpdate>(config::WORLD_BROADCAST_CAPACITY);
    // Serialized snapshots shared across all clients, plus the latest one for lag recovery.
    let (world_bytes_tx, _world_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(config::WORLD_BROADCAST_CAPACITY);
    let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));

    // The obstacle field is generated once, here, and never changes afterwards.
    let arena = Arena::new(arena_config.clone(), StdRng::from_os_rng());

    let state = Arc::new(AppState {
        input_tx,
        world_bytes_tx,
        world_latest_tx,
        config: arena_config,
        map: arena.obstacles().clone(),
    });

    let shutdown = Arc::new(Notify::new());
    spawn_world_serializer(&world_tx, &state);
    tokio::spawn(world_task(
        arena,
        input_rx,
        world_tx,
        Arc::new(SystemClock),
        config::TICK_INTERVAL,
        shutdown.clone(),
    ));

    let app = Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        });

    // Stop the simulation once no more connections are being served.
    shutdown.notify_one();
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // Keep serving without graceful shutdown.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    // A bad arena config is fatal before anything binds.
    let path = config::arena_config_path();
    let arena_config = config::load_arena_config(&path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to load arena config");
        std::io::Error::other(e)
    })?;

    let address = SocketAddr::new(config::bind_addr(), config::http_port());

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, Arc::new(arena_config)).await
}
