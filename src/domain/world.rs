// World aggregate and per-tick side effects.

use crate::domain::state::{Obstacle, ObstacleId, Player, PlayerId, Projectile};
use std::collections::BTreeMap;

/// Owner of every entity in the arena.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub players: BTreeMap<PlayerId, Player>,
    pub projectiles: Vec<Projectile>,
    /// Fixed-size pool; index order is stable across respawns.
    pub obstacles: Vec<Obstacle>,
    /// Destroyed obstacle id -> simulation time it comes back.
    pub respawns: BTreeMap<ObstacleId, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub player_id: PlayerId,
    pub level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill {
    pub victim_id: PlayerId,
    /// `None` for environmental deaths or when the shooter already left.
    pub killer_id: Option<PlayerId>,
}

/// Side effects of one simulation step that the world task forwards or logs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub level_ups: Vec<LevelUp>,
    pub kills: Vec<Kill>,
    pub destroyed: Vec<ObstacleId>,
    pub respawned: Vec<ObstacleId>,
}

impl TickOutcome {
    pub fn push_levels(&mut self, player_id: PlayerId, levels: Vec<u32>) {
        self.level_ups
            .extend(levels.into_iter().map(|level| LevelUp { player_id, level }));
    }
}
