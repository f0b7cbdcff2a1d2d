// Constructors for fresh players and obstacles.

use crate::domain::state::{
    FirePattern, Obstacle, ObstacleId, ObstacleShape, Player, PlayerId, PlayerInput,
};
use crate::domain::systems::progression::{apply_tier, calc_xp_to_level, reset_combat_stats};
use crate::domain::tuning::{ArenaTuning, ObstacleTuning, WorldTuning};
use rand::Rng;

/// Uniform point inside the world bounds.
pub fn random_point<R: Rng>(rng: &mut R, world: &WorldTuning) -> (f32, f32) {
    (
        rng.random_range(0.0..=world.width),
        rng.random_range(0.0..=world.height),
    )
}

/// Level-1 player at `spawn` with baseline stats.
pub fn new_player(id: PlayerId, name: String, spawn: (f32, f32), tuning: &ArenaTuning) -> Player {
    let mut player = Player {
        id,
        name,
        x: spawn.0,
        y: spawn.1,
        angle: 0.0,
        size: tuning.player.radius,
        hp: 0.0,
        max_hp: 0.0,
        score: 0,
        xp: 0,
        level: 1,
        xp_to_level: calc_xp_to_level(1),
        tier: 1,
        damage: 0.0,
        damage_bonus: 0.0,
        bullet_size: 0.0,
        pattern: FirePattern::Single,
        speed: 0.0,
        regen: 0.0,
        fire_cooldown: 0.0,
        bullet_speed: 0.0,
        bullet_life: 0.0,
        last_shot: None,
        input: PlayerInput::default(),
    };
    reset_combat_stats(&mut player, &tuning.player, &tuning.projectile);
    apply_tier(&mut player);
    player
}

/// Randomised obstacle: 50/50 rectangle or hexagon, anywhere in the world, full health.
pub fn new_obstacle<R: Rng>(
    id: ObstacleId,
    rng: &mut R,
    world: &WorldTuning,
    tuning: &ObstacleTuning,
) -> Obstacle {
    let (x, y) = random_point(rng, world);
    let shape = if rng.random_bool(0.5) {
        ObstacleShape::Rect {
            w: rng.random_range(tuning.min_side..tuning.max_side),
            h: rng.random_range(tuning.min_side..tuning.max_side),
        }
    } else {
        ObstacleShape::Hex {
            size: rng.random_range(tuning.min_hex..tuning.max_hex),
        }
    };
    let max_hp = rng.random_range(tuning.min_hp..tuning.max_hp).round();

    Obstacle {
        id,
        x,
        y,
        shape,
        hp: max_hp,
        max_hp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn new_player_starts_at_level_one_baseline() {
        let tuning = ArenaTuning::default();
        let p = new_player(7, "ace".to_string(), (10.0, 20.0), &tuning);
        assert_eq!(p.level, 1);
        assert_eq!(p.xp_to_level, 10);
        assert_eq!((p.score, p.xp), (0, 0));
        assert_eq!((p.hp, p.max_hp), (100.0, 100.0));
        assert_eq!(p.speed, 220.0);
        assert_eq!(p.fire_cooldown, 0.3);
        assert_eq!(p.regen, 1.0);
        assert_eq!(p.bullet_life, 1.8);
        assert_eq!(p.bullet_speed, 850.0);
        assert_eq!(p.damage, 20.0);
        assert_eq!(p.bullet_size, 5.0);
        assert_eq!(p.tier, 1);
    }

    #[test]
    fn obstacles_stay_in_bounds_with_full_health() {
        let mut rng = Pcg32::seed_from_u64(42);
        let world = WorldTuning::default();
        let tuning = ObstacleTuning::default();
        let mut rects = 0;
        let mut hexes = 0;
        for id in 0..200 {
            let o = new_obstacle(id, &mut rng, &world, &tuning);
            assert_eq!(o.id, id);
            assert!((0.0..=world.width).contains(&o.x));
            assert!((0.0..=world.height).contains(&o.y));
            assert_eq!(o.hp, o.max_hp);
            assert!(o.max_hp >= tuning.min_hp && o.max_hp <= tuning.max_hp);
            match o.shape {
                ObstacleShape::Rect { w, h } => {
                    rects += 1;
                    assert!(w >= tuning.min_side && w < tuning.max_side);
                    assert!(h >= tuning.min_side && h < tuning.max_side);
                }
                ObstacleShape::Hex { size } => {
                    hexes += 1;
                    assert!(size >= tuning.min_hex && size < tuning.max_hex);
                }
            }
        }
        assert!(rects > 50 && hexes > 50);
    }
}
