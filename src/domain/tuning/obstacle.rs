/// Gameplay tuning for destructible obstacles.

#[derive(Debug, Clone, Copy)]
pub struct ObstacleTuning {
    /// Rectangle side lengths are rolled uniformly in `[min_side, max_side)`.
    pub min_side: f32,
    pub max_side: f32,

    /// Hexagon sizes are rolled uniformly in `[min_hex, max_hex)`.
    pub min_hex: f32,
    pub max_hex: f32,

    /// Structural health is rolled uniformly in `[min_hp, max_hp)`.
    pub min_hp: f32,
    pub max_hp: f32,

    /// Push applied to a player whose centre is inside a hexagon, per tick.
    pub hex_push: f32,

    /// Seconds between destruction and respawn.
    pub respawn_seconds: f64,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            min_side: 40.0,
            max_side: 140.0,
            min_hex: 40.0,
            max_hex: 100.0,
            min_hp: 30.0,
            max_hp: 120.0,
            hex_push: 3.0,
            respawn_seconds: 10.0,
        }
    }
}
