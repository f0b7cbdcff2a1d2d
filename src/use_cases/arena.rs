// Arena orchestration: channel wiring around the single world task.

use crate::domain::{ArenaTuning, Simulation};
use crate::use_cases::game::world_task;
use crate::use_cases::{GameEvent, WorldUpdate};
use axum::extract::ws::Utf8Bytes;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};

/// Settings for spawning the arena world.
#[derive(Debug, Clone)]
pub struct ArenaSettings {
    /// Capacity for inbound gateway events.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast world updates.
    pub world_broadcast_capacity: usize,
    /// Simulation step interval.
    pub tick_interval: Duration,
    /// Snapshot interval, independent of the tick.
    pub broadcast_interval: Duration,
    pub tuning: ArenaTuning,
    /// RNG seed for spawns and obstacle geometry.
    pub seed: u64,
}

/// Channels shared by every connection to the arena.
#[derive(Clone)]
pub struct ArenaHandle {
    /// Sender for game events into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Broadcast sender for raw world updates.
    pub world_tx: broadcast::Sender<WorldUpdate>,
    /// Broadcast sender for serialized world updates.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    /// Watch sender holding the latest serialized world update.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    /// Arena width and height, reported in the welcome message.
    pub world_size: (f32, f32),
}

/// Creates the arena channels and spawns its world task.
pub fn spawn_arena(settings: ArenaSettings) -> ArenaHandle {
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(settings.input_channel_capacity);
    let (world_tx, _world_rx) =
        broadcast::channel::<WorldUpdate>(settings.world_broadcast_capacity);
    let (world_bytes_tx, _world_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(settings.world_broadcast_capacity);
    let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));

    let world = &settings.tuning.world;
    let world_size = (world.width, world.height);
    let sim = Simulation::new(settings.tuning, settings.seed);

    // Spawn the authoritative world loop.
    tokio::spawn(world_task(
        sim,
        input_rx,
        world_tx.clone(),
        settings.tick_interval,
        settings.broadcast_interval,
    ));

    ArenaHandle {
        input_tx,
        world_tx,
        world_bytes_tx,
        world_latest_tx,
        world_size,
    }
}
