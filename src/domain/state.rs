// Domain-level simulation entities and input/snapshot types.

pub type PlayerId = u64;
pub type ObstacleId = u32;

/// Latched input state for a player. The gateway overwrites fields; the tick only reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub aim_x: f32,
    pub aim_y: f32,
    pub firing: bool,
    pub auto_fire: bool,
}

/// Partial input update from a client; `None` keeps the latched value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputPatch {
    pub up: Option<bool>,
    pub down: Option<bool>,
    pub left: Option<bool>,
    pub right: Option<bool>,
    pub aim_x: Option<f32>,
    pub aim_y: Option<f32>,
    pub firing: Option<bool>,
    pub auto_fire: Option<bool>,
}

impl PlayerInput {
    /// Field-by-field override with the values present in `patch`.
    pub fn merge(&mut self, patch: InputPatch) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.up, patch.up);
        set(&mut self.down, patch.down);
        set(&mut self.left, patch.left);
        set(&mut self.right, patch.right);
        set(&mut self.aim_x, patch.aim_x);
        set(&mut self.aim_y, patch.aim_y);
        set(&mut self.firing, patch.firing);
        set(&mut self.auto_fire, patch.auto_fire);
    }

    pub fn wants_fire(&self) -> bool {
        self.firing || self.auto_fire
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePattern {
    Single,
    /// Two muzzles mirrored about the facing axis.
    Dual,
}

/// A circle in world space, used for every round collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub size: f32,

    pub hp: f32,
    pub max_hp: f32,

    // Progression.
    pub score: u64,
    pub xp: u64,
    pub level: u32,
    pub xp_to_level: u64,

    // Tier-derived combat stats. `damage` is the tier base plus `damage_bonus`.
    pub tier: u8,
    pub damage: f32,
    pub damage_bonus: f32,
    pub bullet_size: f32,
    pub pattern: FirePattern,

    // Upgradeable stats.
    pub speed: f32,
    pub regen: f32,
    pub fire_cooldown: f32,
    pub bullet_speed: f32,
    pub bullet_life: f32,

    /// Simulation time of the last shot; `None` until the first one.
    pub last_shot: Option<f64>,
    pub input: PlayerInput,
}

impl Player {
    pub fn circle(&self) -> Circle {
        Circle {
            x: self.x,
            y: self.y,
            r: self.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub life: f32,
    pub damage: f32,
}

impl Projectile {
    pub fn circle(&self) -> Circle {
        Circle {
            x: self.x,
            y: self.y,
            r: self.radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleShape {
    /// Axis-aligned rectangle anchored at its top-left corner.
    Rect { w: f32, h: f32 },
    /// Hexagon centred on the obstacle position.
    Hex { size: f32 },
}

/// Score and experience granted for a kill or a destroyed obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub score: u64,
    pub xp: u64,
}

impl ObstacleShape {
    pub fn reward(&self) -> Reward {
        match self {
            ObstacleShape::Rect { .. } => Reward { score: 10, xp: 5 },
            ObstacleShape::Hex { .. } => Reward { score: 30, xp: 12 },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub x: f32,
    pub y: f32,
    pub shape: ObstacleShape,
    pub hp: f32,
    pub max_hp: f32,
}

impl Obstacle {
    /// Destroyed obstacles are ignored by collision and hit tests until respawned.
    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0.0
    }
}

#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub size: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub score: u64,
    pub level: u32,
    pub xp: u64,
    pub xp_to_level: u64,
    pub tier: u8,
}

#[derive(Debug, Clone)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Debug, Clone)]
pub struct ObstacleSnapshot {
    pub id: ObstacleId,
    pub x: f32,
    pub y: f32,
    pub shape: ObstacleShape,
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub name: String,
    pub score: u64,
    pub level: u32,
}

/// Read-only copy of everything clients render.
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub players: Vec<PlayerSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            x: p.x,
            y: p.y,
            angle: p.angle,
            size: p.size,
            hp: p.hp,
            max_hp: p.max_hp,
            score: p.score,
            level: p.level,
            xp: p.xp,
            xp_to_level: p.xp_to_level,
            tier: p.tier,
        }
    }
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            x: p.x,
            y: p.y,
            radius: p.radius,
        }
    }
}

impl From<&Obstacle> for ObstacleSnapshot {
    fn from(o: &Obstacle) -> Self {
        Self {
            id: o.id,
            x: o.x,
            y: o.y,
            shape: o.shape,
            hp: o.hp,
            max_hp: o.max_hp,
        }
    }
}

impl From<&Player> for LeaderboardEntry {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            score: p.score,
            level: p.level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_only_present_fields() {
        let mut input = PlayerInput {
            up: true,
            aim_x: 10.0,
            aim_y: 20.0,
            ..Default::default()
        };

        input.merge(InputPatch {
            left: Some(true),
            aim_x: Some(55.0),
            firing: Some(true),
            ..Default::default()
        });

        assert!(input.up);
        assert!(input.left);
        assert!(input.firing);
        assert_eq!(input.aim_x, 55.0);
        assert_eq!(input.aim_y, 20.0);
        assert!(!input.auto_fire);
    }

    #[test]
    fn auto_fire_counts_as_firing() {
        let input = PlayerInput {
            auto_fire: true,
            ..Default::default()
        };
        assert!(input.wants_fire());
        assert!(!PlayerInput::default().wants_fire());
    }
}
