/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Baseline muzzle speed in pixels per second.
    pub speed: f32,

    /// Baseline lifetime in seconds before the projectile is despawned.
    pub life_time: f32,

    /// Perpendicular offset of each muzzle for the dual fire pattern.
    pub dual_offset: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 850.0,
            life_time: 1.8,
            dual_offset: 10.0,
        }
    }
}
