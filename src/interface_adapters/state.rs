use crate::use_cases::{ArenaHandle, GameEvent};
use axum::extract::ws::Utf8Bytes;
use tokio::sync::{broadcast, mpsc, watch};

#[derive(Clone)]
pub struct AppState {
    // Events flowing from the network into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Serialized world updates, shared across all connections.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized world update for lag recovery.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    // Per-connection buffer for targeted notices.
    pub notice_channel_capacity: usize,
    // Arena dimensions reported on welcome.
    pub world_size: (f32, f32),
}

impl AppState {
    pub fn new(arena: &ArenaHandle, notice_channel_capacity: usize) -> Self {
        Self {
            input_tx: arena.input_tx.clone(),
            world_bytes_tx: arena.world_bytes_tx.clone(),
            world_latest_tx: arena.world_latest_tx.clone(),
            notice_channel_capacity,
            world_size: arena.world_size,
        }
    }
}
