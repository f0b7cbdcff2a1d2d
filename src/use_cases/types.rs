// Use-case level inputs/outputs for the world task.

use crate::domain::{InputPatch, PlayerId, UpgradeKind, WorldSnapshot};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum GameEvent {
    Join {
        player_id: PlayerId,
        name: String,
        // Targeted notifications for this player's connection.
        notice_tx: mpsc::Sender<PlayerNotice>,
    },
    Leave {
        player_id: PlayerId,
    },
    Input {
        player_id: PlayerId,
        patch: InputPatch,
    },
    Upgrade {
        player_id: PlayerId,
        kind: UpgradeKind,
    },
}

/// Messages addressed to a single player rather than the whole arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerNotice {
    LevelUp { level: u32 },
}

#[derive(Debug, Clone)]
pub struct WorldUpdate {
    /// Broadcast counter, increases by one per snapshot.
    pub tick: u64,
    pub snapshot: WorldSnapshot,
}
