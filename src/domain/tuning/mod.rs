// Gameplay tuning, kept separate from runtime/server configuration.

pub mod obstacle;
pub mod player;
pub mod projectile;
pub mod world;

pub use obstacle::ObstacleTuning;
pub use player::PlayerTuning;
pub use projectile::ProjectileTuning;
pub use world::WorldTuning;

/// Bundle of every tuning table the simulation reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArenaTuning {
    pub world: WorldTuning,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub obstacle: ObstacleTuning,
}
