/// Arena-wide tuning: bounds, pool sizes and step limits.

#[derive(Debug, Clone, Copy)]
pub struct WorldTuning {
    /// World width in pixels.
    pub width: f32,

    /// World height in pixels.
    pub height: f32,

    /// Number of obstacles kept in the pool.
    pub obstacle_count: usize,

    /// Upper bound on a single step's dt, in seconds.
    pub max_dt: f32,
}

impl WorldTuning {
    /// Clamps a point to `[0, width] x [0, height]`.
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: 3000.0,
            height: 2000.0,
            obstacle_count: 80,
            max_dt: 0.1,
        }
    }
}
