use crate::domain::PlayerId;
use crate::interface_adapters::protocol::{ClientMessage, ServerMessage, WorldStateDto};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{GameEvent, WorldUpdate};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    JoinRejected,
    WorldUpdatesClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each snapshot once and broadcast the shared bytes.
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::State {
                    state: WorldStateDto::from(update),
                };
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize world snapshot");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                // Store the latest bytes for lag recovery.
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest snapshot"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub fn spawn_world_serializer(
    world_tx: &broadcast::Sender<WorldUpdate>,
    state: &AppState,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(world_update_serializer(
        world_tx.subscribe(),
        state.world_bytes_tx.clone(),
        state.world_latest_tx.clone(),
    ))
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Separate connection id for correlating logs before/after a player_id exists.
    let conn_id = NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed);
    let span = info_span!("conn", conn_id, player_id = tracing::field::Empty);
    serve_connection(socket, state).instrument(span).await;
}

async fn serve_connection(mut socket: WebSocket, state: Arc<AppState>) {
    let mut ctx = match bootstrap_connection(&mut socket, &state).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::ERROR,
                    reason: "bootstrap failed".into(),
                })))
                .await;
            let _ = socket.close().await;
            return;
        }
    };

    Span::current().record("player_id", ctx.player_id);
    info!("client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

struct ConnCtx {
    pub player_id: PlayerId,
    pub input_tx: mpsc::Sender<GameEvent>,
    pub world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    pub world_latest_rx: watch::Receiver<Utf8Bytes>,
    // Count lag recovery snapshots sent to this client.
    pub lag_recovery_count: u64,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,

    pub dropped_msgs: u32,

    pub last_input_full_log: Instant,
    pub last_world_lag_log: Instant,
    pub last_invalid_input_log: Instant,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    state: &AppState,
) -> Result<ConnCtx, NetError> {
    // Subscribe to updates *before* doing anything else (awaits) to not miss packets.
    let world_bytes_rx = state.world_bytes_tx.subscribe();
    let world_latest_rx = state.world_latest_tx.subscribe();

    // The world task owns id allocation; it replies once the tank is spawned.
    let (reply, reply_rx) = oneshot::channel();
    state
        .input_tx
        .send(GameEvent::Join { reply })
        .await
        .map_err(|_| NetError::InputClosed)?;
    let player_id = reply_rx.await.map_err(|_| NetError::JoinRejected)?;

    // Tell the client who it is, what the rules are and where the walls stand.
    // If this fails, compensate with Leave to avoid "spawned but never connected".
    let init_msg = ServerMessage::init(player_id, &state.config, &state.map);
    let bytes_out = match send_message(socket, &init_msg).await {
        Ok(bytes) => bytes as u64,
        Err(e) => {
            state
                .input_tx
                .send(GameEvent::Leave { player_id })
                .await
                .map_err(|_| NetError::InputClosed)?; // InputClosed takes precedence
            return Err(e);
        }
    };

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        player_id,
        input_tx: state.input_tx.clone(),
        world_bytes_rx,
        world_latest_rx,
        lag_recovery_count: 0,

        msgs_in: 0,
        msgs_out: 1,
        bytes_in: 0,
        bytes_out,

        dropped_msgs: 0,

        last_input_full_log: now,
        last_world_lag_log: now,
        last_invalid_input_log: now,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

/// Parses one text frame into an intent event and hands it to the world task.
///
/// Malformed JSON, unknown message types and out-of-range values are dropped without telling
/// the sender. A full input queue drops the intent too; only a closed queue is fatal.
fn process_text_message(
    player_id: PlayerId,
    input_tx: &mpsc::Sender<GameEvent>,
    text: &str,
    dropped_msgs: &mut u32,
    last_input_full_log: &mut Instant,
    last_invalid_input_log: &mut Instant,
) -> Result<LoopControl, NetError> {
    let intent = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg.into_intent(),
        Err(parse_err) => {
            *dropped_msgs += 1;
            if should_log(last_invalid_input_log) {
                warn!(
                    player_id,
                    bytes = text.len(),
                    error = %parse_err,
                    "failed to parse client message; dropping"
                );
            }
            return Ok(LoopControl::Continue);
        }
    };

    let Some(intent) = intent else {
        *dropped_msgs += 1;
        if should_log(last_invalid_input_log) {
            debug!(player_id, "unknown or out-of-range intent; dropping");
        }
        return Ok(LoopControl::Continue);
    };

    match input_tx.try_send(GameEvent::Intent { player_id, intent }) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(last_input_full_log) {
                warn!(player_id, "input channel full; dropping intent");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let player_id = ctx.player_id;

    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        input_tx,
        world_bytes_rx,
        world_latest_rx,
        lag_recovery_count,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        dropped_msgs,
        last_input_full_log,
        last_world_lag_log,
        last_invalid_input_log,
        ..
    } = ctx;

    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming_ws(
                    incoming,
                    player_id,
                    input_tx,
                    msgs_in,
                    bytes_in,
                    dropped_msgs,
                    last_input_full_log,
                    last_invalid_input_log,
                ) {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            world_msg = world_bytes_rx.recv() => {
                match world_msg {
                    Ok(bytes) => match forward_world_bytes(bytes, socket, msgs_out, bytes_out).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(last_world_lag_log) {
                            warn!(missed = n, "world updates lagged; sending snapshot");
                        }

                        // Resync strategy: send the latest world snapshot.
                        let latest = world_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            false
                        } else {
                            *lag_recovery_count += 1;
                            match forward_world_bytes(latest, socket, msgs_out, bytes_out).await {
                                LoopControl::Continue => false,
                                LoopControl::Disconnect => true,
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::WorldUpdatesClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(
        player_id,
        input_tx,
        *msgs_in,
        *msgs_out,
        *bytes_in,
        *bytes_out,
        *dropped_msgs,
        *lag_recovery_count,
    )
    .await
    {
        warn!(error = ?e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    if let Some(err) = fatal {
        Err(err)
    } else {
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    player_id: PlayerId,
    input_tx: &mpsc::Sender<GameEvent>,
    msgs_in: &mut u64,
    bytes_in: &mut u64,
    dropped_msgs: &mut u32,
    last_input_full_log: &mut Instant,
    last_invalid_input_log: &mut Instant,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                *msgs_in += 1;
                *bytes_in += text.len() as u64;
                process_text_message(
                    player_id,
                    input_tx,
                    text.as_str(),
                    dropped_msgs,
                    last_input_full_log,
                    last_invalid_input_log,
                )
            }
            Message::Binary(data) => {
                // Only text intents are understood; binary frames are ignored.
                *msgs_in += 1;
                *bytes_in += data.len() as u64;
                *dropped_msgs += 1;
                if should_log(last_invalid_input_log) {
                    debug!(player_id, bytes = data.len(), "binary frame ignored");
                }
                Ok(LoopControl::Continue)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(player_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(player_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_world_bytes(
    world_msg: Utf8Bytes,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    let bytes_len = world_msg.len();
    match socket
        .send(Message::Text(world_msg))
        .await
        .map_err(NetError::Ws)
    {
        Ok(()) => {
            *msgs_out += 1;
            *bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Disconnect follows immediately.
            debug!(error = ?err, "failed to send world snapshot");
            LoopControl::Disconnect
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn disconnect_cleanup(
    player_id: PlayerId,
    input_tx: &mpsc::Sender<GameEvent>,
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    dropped_msgs: u32,
    lag_recovery_count: u64,
) -> Result<(), NetError> {
    // Never dropped under load; a lost Leave leaves a ghost tank in the arena.
    input_tx
        .send(GameEvent::Leave { player_id })
        .await
        .map_err(|_| NetError::InputClosed)?;

    debug!(
        player_id,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        dropped_msgs,
        lag_recovery_count,
        "connection stats"
    );
    info!(player_id, "client disconnected");
    Ok(())
}
