// Domain layer: core simulation types and rules.

pub mod factory;
pub mod geometry;
pub mod simulation;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod world;

pub use simulation::Simulation;
pub use state::{
    InputPatch, LeaderboardEntry, ObstacleId, ObstacleShape, ObstacleSnapshot, PlayerId,
    PlayerSnapshot, ProjectileSnapshot, WorldSnapshot,
};
pub use systems::upgrades::UpgradeKind;
pub use tuning::ArenaTuning;
pub use world::{Kill, LevelUp, TickOutcome};
