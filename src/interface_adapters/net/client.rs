use crate::domain::{InputPatch, PlayerId, UpgradeKind};
use crate::interface_adapters::protocol::{
    ClientMessage, ServerMessage, StateDto, WorldSizeDto,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::{next_player_id, rand_id};
use crate::use_cases::{ArenaHandle, GameEvent, PlayerNotice, WorldUpdate};

use axum::{
    Error,
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    WorldUpdatesClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_NAME_CHARS: usize = 16;
const DEFAULT_NAME: &str = "Player";

pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each world update once and broadcast the shared bytes.
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::State(StateDto::from(update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize world update");
                        continue;
                    }
                };

                // Convert once and broadcast shared UTF-8 bytes to all clients.
                let bytes = Utf8Bytes::from(txt);
                // Store the latest bytes for lag recovery.
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest update"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub fn spawn_world_serializer(arena: &ArenaHandle) {
    tokio::spawn(world_update_serializer(
        arena.world_tx.subscribe(),
        arena.world_bytes_tx.clone(),
        arena.world_latest_tx.clone(),
    ));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        // Separate connection id for correlating logs before/after a player_id exists.
        let conn_id = rand_id();
        let span = info_span!("conn", conn_id, player_id = tracing::field::Empty);
        handle_socket(socket, state).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    // Subscribe before any await so the first broadcasts are not missed.
    let mut ctx = ConnCtx::new(&state);
    debug!("client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

struct ConnCtx {
    // Set once the client has joined.
    pub player_id: Option<PlayerId>,
    pub input_tx: mpsc::Sender<GameEvent>,
    pub world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    pub world_latest_rx: watch::Receiver<Utf8Bytes>,
    // Level-up notices for this player; registered with the join event.
    pub notice_rx: Option<mpsc::Receiver<PlayerNotice>>,
    pub notice_capacity: usize,
    pub world_size: (f32, f32),
    // Count lag recovery snapshots sent to this client.
    pub lag_recovery_count: u64,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,

    pub invalid_json: u32,

    pub last_input_full_log: Instant,
    pub last_world_lag_log: Instant,
    pub last_invalid_input_log: Instant,
}

impl ConnCtx {
    fn new(state: &AppState) -> Self {
        let now = Instant::now() - LOG_THROTTLE;
        Self {
            player_id: None,
            input_tx: state.input_tx.clone(),
            world_bytes_rx: state.world_bytes_tx.subscribe(),
            world_latest_rx: state.world_latest_tx.subscribe(),
            notice_rx: None,
            notice_capacity: state.notice_channel_capacity,
            world_size: state.world_size,
            lag_recovery_count: 0,

            msgs_in: 0,
            msgs_out: 0,
            bytes_in: 0,
            bytes_out: 0,

            invalid_json: 0,

            last_input_full_log: now,
            last_world_lag_log: now,
            last_invalid_input_log: now,
        }
    }
}

enum LoopControl {
    Continue,
    Disconnect,
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

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

/// Trimmed display name, or the default when empty or too long.
fn sanitize_name(raw: &str) -> String {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        DEFAULT_NAME.to_string()
    } else {
        name.to_string()
    }
}

fn sanitize_input(patch: InputPatch) -> Option<InputPatch> {
    let finite = |v: Option<f32>| v.is_none_or(f32::is_finite);
    if !finite(patch.aim_x) || !finite(patch.aim_y) {
        return None;
    }
    Some(patch)
}

// Pends forever until a join registers the receiver.
async fn recv_notice(notice_rx: &mut Option<mpsc::Receiver<PlayerNotice>>) -> Option<PlayerNotice> {
    match notice_rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        // disconnect becomes true on error
        let disconnect: bool = tokio::select! {
            // Incoming Message from Client
            incoming = socket.recv() => {
                match handle_incoming_ws(socket, incoming, ctx).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            // Outgoing World Update
            world_msg = ctx.world_bytes_rx.recv() => {
                match world_msg {
                    Ok(bytes) => match forward_world_bytes(bytes, socket, ctx).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(&mut ctx.last_world_lag_log) {
                            warn!(missed = n, "world updates lagged; sending snapshot");
                        }

                        // Resync strategy: send the latest world snapshot.
                        let latest = ctx.world_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            false
                        } else {
                            // Track how often we need to recover from lag.
                            ctx.lag_recovery_count += 1;
                            match forward_world_bytes(latest, socket, ctx).await {
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

            // Outgoing notices addressed to this player
            notice = recv_notice(&mut ctx.notice_rx) => {
                match notice {
                    Some(notice) => {
                        let msg = ServerMessage::from(notice);
                        match send_message(socket, &msg).await {
                            Ok(bytes) => {
                                ctx.msgs_out += 1;
                                ctx.bytes_out += bytes as u64;
                                false
                            }
                            Err(err) => {
                                warn!(error = ?err, "failed to send notice");
                                true
                            }
                        }
                    }
                    None => {
                        // World dropped our route; stop polling it.
                        ctx.notice_rx = None;
                        false
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

    if let Err(e) = disconnect_cleanup(ctx).await {
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

async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Join { name }) => handle_join(socket, ctx, &name).await,
                    Ok(ClientMessage::Input { data }) => {
                        let Some(player_id) = ctx.player_id else {
                            if should_log(&mut ctx.last_invalid_input_log) {
                                debug!("input before join ignored");
                            }
                            return Ok(LoopControl::Continue);
                        };
                        let Some(patch) = sanitize_input(data.into()) else {
                            if should_log(&mut ctx.last_invalid_input_log) {
                                warn!(player_id, "invalid input values (NaN/inf); dropping");
                            }
                            return Ok(LoopControl::Continue);
                        };
                        forward_event(ctx, GameEvent::Input { player_id, patch })
                    }
                    Ok(ClientMessage::Upgrade { choice }) => {
                        let Some(player_id) = ctx.player_id else {
                            if should_log(&mut ctx.last_invalid_input_log) {
                                debug!("upgrade before join ignored");
                            }
                            return Ok(LoopControl::Continue);
                        };
                        let kind = UpgradeKind::from_choice(&choice);
                        forward_event(ctx, GameEvent::Upgrade { player_id, kind })
                    }
                    Err(parse_err) => {
                        // Malformed messages are dropped; the connection stays open.
                        ctx.invalid_json += 1;
                        if should_log(&mut ctx.last_invalid_input_log) {
                            warn!(
                                player_id = ?ctx.player_id,
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }
                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                if should_log(&mut ctx.last_invalid_input_log) {
                    debug!("binary message ignored");
                }
                Ok(LoopControl::Continue)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(player_id = ?ctx.player_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(player_id = ?ctx.player_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn handle_join(
    socket: &mut WebSocket,
    ctx: &mut ConnCtx,
    raw_name: &str,
) -> Result<LoopControl, NetError> {
    if let Some(player_id) = ctx.player_id {
        // Ignore repeated joins to keep the session stable.
        if should_log(&mut ctx.last_invalid_input_log) {
            warn!(player_id, "duplicate join ignored");
        }
        return Ok(LoopControl::Continue);
    }

    let player_id = next_player_id();
    let name = sanitize_name(raw_name);
    let (notice_tx, notice_rx) = mpsc::channel(ctx.notice_capacity);

    // Join is queued before welcome so the first snapshot after welcome can include the player.
    ctx.input_tx
        .send(GameEvent::Join {
            player_id,
            name: name.clone(),
            notice_tx,
        })
        .await
        .map_err(|_| NetError::InputClosed)?;
    ctx.player_id = Some(player_id);
    ctx.notice_rx = Some(notice_rx);
    tracing::Span::current().record("player_id", player_id);

    let welcome = ServerMessage::Welcome {
        id: player_id,
        world_size: WorldSizeDto {
            w: ctx.world_size.0,
            h: ctx.world_size.1,
        },
    };
    match send_message(socket, &welcome).await {
        Ok(bytes) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes as u64;
            info!(player_id, %name, "client joined");
            Ok(LoopControl::Continue)
        }
        Err(err) => {
            // Cleanup sends the compensating Leave.
            warn!(error = ?err, "failed to send welcome");
            Ok(LoopControl::Disconnect)
        }
    }
}

fn forward_event(ctx: &mut ConnCtx, event: GameEvent) -> Result<LoopControl, NetError> {
    match ctx.input_tx.try_send(event) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(TrySendError::Full(_evt)) => {
            if should_log(&mut ctx.last_input_full_log) {
                warn!(player_id = ?ctx.player_id, "input channel full; dropping input");
            }
            Ok(LoopControl::Continue)
        }
        Err(TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
    }
}

async fn forward_world_bytes(
    world_msg: Utf8Bytes,
    socket: &mut WebSocket,
    ctx: &mut ConnCtx,
) -> LoopControl {
    let bytes_len = world_msg.len();
    match socket
        .send(Message::Text(world_msg))
        .await
        .map_err(NetError::Ws)
    {
        Ok(()) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send world update");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(ctx: &mut ConnCtx) -> Result<(), NetError> {
    if let Some(player_id) = ctx.player_id {
        // Removal is immediate; there is no grace period for reconnects.
        ctx.input_tx
            .send(GameEvent::Leave { player_id })
            .await
            .map_err(|_| NetError::InputClosed)?;
    }
    ctx.notice_rx = None;

    debug!(
        player_id = ?ctx.player_id,
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        lag_recovery_count = ctx.lag_recovery_count,
        "connection stats"
    );
    info!(player_id = ?ctx.player_id, "client disconnected");
    Ok(())
}
