//! The authoritative arena simulation.
//!
//! A [`Simulation`] owns the [`World`], the RNG and the simulation clock. The world task is its
//! only writer: gateway events are applied between steps and snapshots are taken between steps,
//! so readers never observe a half-applied tick.

use crate::domain::factory::{new_obstacle, new_player, random_point};
use crate::domain::state::{
    InputPatch, LeaderboardEntry, ObstacleId, ObstacleSnapshot, Player, PlayerId,
    PlayerSnapshot, ProjectileSnapshot, WorldSnapshot,
};
use crate::domain::systems::contact::{self, ContactConfig};
use crate::domain::systems::progression::soft_reset_on_death;
use crate::domain::systems::upgrades::{UpgradeKind, apply_upgrade};
use crate::domain::systems::{movement, projectiles};
use crate::domain::tuning::ArenaTuning;
use crate::domain::world::{Kill, TickOutcome, World};
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Number of rows in the leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

pub struct Simulation {
    tuning: ArenaTuning,
    world: World,
    rng: Pcg32,
    /// Seconds of simulated time; advances by the clamped dt of each step.
    clock: f64,
    next_projectile_id: u64,
}

impl Simulation {
    /// Builds a world with the full obstacle pool.
    pub fn new(tuning: ArenaTuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let obstacles = (0..tuning.world.obstacle_count)
            .map(|id| new_obstacle(id as ObstacleId, &mut rng, &tuning.world, &tuning.obstacle))
            .collect();

        Self {
            tuning,
            world: World {
                obstacles,
                ..World::default()
            },
            rng,
            clock: 0.0,
            next_projectile_id: 1,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.world.players.get(&id)
    }

    /// Spawns a level-1 player at a random position.
    pub fn join(&mut self, id: PlayerId, name: String) -> &Player {
        let spawn = random_point(&mut self.rng, &self.tuning.world);
        let player = new_player(id, name, spawn, &self.tuning);
        self.world.players.insert(id, player);
        &self.world.players[&id]
    }

    /// Removes the player immediately. Its projectiles keep flying.
    pub fn leave(&mut self, id: PlayerId) -> bool {
        self.world.players.remove(&id).is_some()
    }

    pub fn apply_input(&mut self, id: PlayerId, patch: InputPatch) -> bool {
        match self.world.players.get_mut(&id) {
            Some(player) => {
                player.input.merge(patch);
                true
            }
            None => false,
        }
    }

    pub fn apply_upgrade(&mut self, id: PlayerId, kind: UpgradeKind) -> bool {
        match self.world.players.remove(&id) {
            Some(player) => {
                self.world.players.insert(id, apply_upgrade(player, kind));
                true
            }
            None => false,
        }
    }

    /// Replaces the pool entry with a fresh obstacle of the same id and clears its schedule.
    pub fn respawn_obstacle(&mut self, id: ObstacleId) {
        self.world.respawns.remove(&id);
        let fresh = new_obstacle(id, &mut self.rng, &self.tuning.world, &self.tuning.obstacle);
        if let Some(slot) = self.world.obstacles.iter_mut().find(|o| o.id == id) {
            *slot = fresh;
        }
    }

    /// Advances the world by `dt` seconds (clamped to the configured maximum).
    pub fn step(&mut self, dt: f32) -> TickOutcome {
        let tuning = self.tuning;
        let dt = dt.clamp(0.0, tuning.world.max_dt);
        self.clock += f64::from(dt);
        let now = self.clock;

        let mut outcome = TickOutcome::default();
        let cfg = ContactConfig::new(&tuning.player, &tuning.obstacle);

        let ids: Vec<PlayerId> = self.world.players.keys().copied().collect();
        for id in ids {
            if let Some(p) = self.world.players.get_mut(&id) {
                movement::tick_player(p, dt, &tuning.world);
                contact::resolve_obstacle_contacts(p, &self.world.obstacles, dt, cfg, &tuning.world);
            }

            contact::resolve_player_overlaps(id, &mut self.world.players, dt, cfg, &tuning.world);

            let Some(p) = self.world.players.get_mut(&id) else {
                continue;
            };

            // Passive regeneration.
            p.hp = (p.hp + p.regen * dt).min(p.max_hp);

            projectiles::try_fire(
                p,
                now,
                &mut self.next_projectile_id,
                &mut self.world.projectiles,
                tuning.projectile.dual_offset,
            );

            if p.hp <= 0.0 {
                let spawn = random_point(&mut self.rng, &tuning.world);
                soft_reset_on_death(p, spawn, &tuning.player, &tuning.projectile);
                outcome.kills.push(Kill {
                    victim_id: id,
                    killer_id: None,
                });
            }
        }

        projectiles::tick_projectiles(
            &mut self.world,
            &mut self.rng,
            dt,
            now,
            &tuning,
            &mut outcome,
        );

        // Respawn sweep.
        let due: Vec<ObstacleId> = self
            .world
            .respawns
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in due {
            self.respawn_obstacle(id);
            outcome.respawned.push(id);
        }

        outcome
    }

    /// Top players by score, highest first; ties keep id order.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut ranked: Vec<&Player> = self.world.players.values().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
            .into_iter()
            .take(LEADERBOARD_SIZE)
            .map(LeaderboardEntry::from)
            .collect()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            players: self
                .world
                .players
                .values()
                .map(PlayerSnapshot::from)
                .collect(),
            projectiles: self
                .world
                .projectiles
                .iter()
                .map(ProjectileSnapshot::from)
                .collect(),
            obstacles: self
                .world
                .obstacles
                .iter()
                .map(ObstacleSnapshot::from)
                .collect(),
            leaderboard: self.leaderboard(),
        }
    }
}
