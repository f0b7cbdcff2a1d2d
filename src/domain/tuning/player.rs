/// Gameplay tuning for players.
///
/// Baseline values are what a fresh join (and a soft reset) starts from; upgrades add to them.

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Collision radius in pixels.
    pub radius: f32,

    /// Starting (and post-death) maximum health.
    pub max_hp: f32,

    /// Movement speed in pixels per second.
    pub speed: f32,

    /// Passive health regeneration per second.
    pub regen: f32,

    /// Seconds between shots.
    pub fire_cooldown: f32,

    /// Damage per second taken while touching an obstacle.
    pub obstacle_dps: f32,

    /// Damage per second taken while overlapping another player.
    pub collision_dps: f32,

    /// Displacement applied to each side of an overlapping pair, per evaluation.
    pub collision_push: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 20.0,
            max_hp: 100.0,
            speed: 220.0,
            regen: 1.0,
            fire_cooldown: 0.3,
            obstacle_dps: 12.0,
            collision_dps: 10.0,
            collision_push: 2.0,
        }
    }
}
