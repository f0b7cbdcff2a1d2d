use super::types::{GameEvent, PlayerNotice, WorldUpdate};
use crate::domain::{PlayerId, Simulation, TickOutcome};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

type NoticeRoutes = HashMap<PlayerId, mpsc::Sender<PlayerNotice>>;

/// Owns the simulation: drains gateway events, steps the world and publishes snapshots.
///
/// Ticks and broadcasts share this task, so a snapshot always sees a finished tick.
pub async fn world_task(
    mut sim: Simulation,
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    tick_interval: Duration,
    broadcast_interval: Duration,
) {
    let mut notices = NoticeRoutes::new();

    // A slow tick delays the next one; missed ticks are never burst.
    let mut tick_timer = tokio::time::interval(tick_interval);
    tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut broadcast_timer = tokio::time::interval(broadcast_interval);
    broadcast_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_step = Instant::now();
    let mut broadcast_tick: u64 = 0;

    info!(
        obstacles = sim.world().obstacles.len(),
        tick_ms = tick_interval.as_millis() as u64,
        broadcast_ms = broadcast_interval.as_millis() as u64,
        "world task started"
    );

    loop {
        tokio::select! {
            _ = tick_timer.tick() => {
                let open = drain_events(&mut sim, &mut input_rx, &mut notices);

                let now = Instant::now();
                let dt = now.duration_since(last_step).as_secs_f32();
                last_step = now;

                let outcome = sim.step(dt);
                dispatch_outcome(&outcome, &notices);

                if !open {
                    warn!("input channel closed; world task exiting");
                    break;
                }
            }
            _ = broadcast_timer.tick() => {
                broadcast_tick += 1;
                // No receivers is fine: nobody is connected yet.
                let _ = world_tx.send(WorldUpdate {
                    tick: broadcast_tick,
                    snapshot: sim.snapshot(),
                });
            }
        }
    }
}

/// Applies every queued event. Returns false once all senders are gone.
fn drain_events(
    sim: &mut Simulation,
    input_rx: &mut mpsc::Receiver<GameEvent>,
    notices: &mut NoticeRoutes,
) -> bool {
    loop {
        let ev = match input_rx.try_recv() {
            Ok(ev) => ev,
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        };

        match ev {
            GameEvent::Join {
                player_id,
                name,
                notice_tx,
            } => {
                let player = sim.join(player_id, name);
                info!(
                    player_id,
                    name = %player.name,
                    x = player.x,
                    y = player.y,
                    "player joined"
                );
                notices.insert(player_id, notice_tx);
            }
            GameEvent::Leave { player_id } => {
                notices.remove(&player_id);
                if sim.leave(player_id) {
                    info!(player_id, "player left");
                }
            }
            GameEvent::Input { player_id, patch } => {
                sim.apply_input(player_id, patch);
            }
            GameEvent::Upgrade { player_id, kind } => {
                if sim.apply_upgrade(player_id, kind) {
                    debug!(player_id, ?kind, "upgrade applied");
                }
            }
        }
    }
}

fn dispatch_outcome(outcome: &TickOutcome, notices: &NoticeRoutes) {
    for up in &outcome.level_ups {
        debug!(player_id = up.player_id, level = up.level, "level up");
        let Some(tx) = notices.get(&up.player_id) else {
            continue;
        };
        match tx.try_send(PlayerNotice::LevelUp { level: up.level }) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(_)) => {
                warn!(player_id = up.player_id, "notice channel full; dropping level up");
            }
        }
    }

    for kill in &outcome.kills {
        info!(
            victim_id = kill.victim_id,
            killer_id = ?kill.killer_id,
            "player killed"
        );
    }

    for obstacle_id in &outcome.respawned {
        debug!(obstacle_id, "obstacle respawned");
    }
}
