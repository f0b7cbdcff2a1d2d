use crate::domain::state::{FirePattern, Player, Reward};
use crate::domain::tuning::{PlayerTuning, ProjectileTuning};

/// Combat stats granted by a tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierStats {
    pub tier: u8,
    pub damage: f32,
    pub bullet_size: f32,
    pub pattern: FirePattern,
}

/// Experience needed to advance past `level`: `round(10 * 1.3^(level - 1))`.
pub fn calc_xp_to_level(level: u32) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (10.0 * 1.3_f64.powi(exponent)).round() as u64
}

/// Tier thresholds: level 10 and up is tier 3, level 5 and up is tier 2.
pub fn tier_for_level(level: u32) -> TierStats {
    if level >= 10 {
        TierStats {
            tier: 3,
            damage: 45.0,
            bullet_size: 8.0,
            pattern: FirePattern::Dual,
        }
    } else if level >= 5 {
        TierStats {
            tier: 2,
            damage: 30.0,
            bullet_size: 12.0,
            pattern: FirePattern::Single,
        }
    } else {
        TierStats {
            tier: 1,
            damage: 20.0,
            bullet_size: 5.0,
            pattern: FirePattern::Single,
        }
    }
}

/// Recomputes tier-derived stats from the current level. Idempotent.
pub fn apply_tier(player: &mut Player) {
    let stats = tier_for_level(player.level);
    player.tier = stats.tier;
    player.damage = stats.damage + player.damage_bonus;
    player.bullet_size = stats.bullet_size;
    player.pattern = stats.pattern;
}

/// Adds experience and resolves every level crossed. Returns each new level, in order.
pub fn add_xp_and_resolve_levels(player: &mut Player, xp_gain: u64) -> Vec<u32> {
    let mut gained = Vec::new();
    player.xp += xp_gain;
    while player.xp >= player.xp_to_level {
        player.xp -= player.xp_to_level;
        player.level += 1;
        player.xp_to_level = calc_xp_to_level(player.level);
        apply_tier(player);
        gained.push(player.level);
    }
    gained
}

/// Credits score and experience; returns the levels gained.
pub fn award(player: &mut Player, reward: Reward) -> Vec<u32> {
    player.score += reward.score;
    add_xp_and_resolve_levels(player, reward.xp)
}

/// Reward for killing a player with the given pre-death score and level.
pub fn kill_reward(victim_score: u64, victim_level: u32) -> Reward {
    Reward {
        score: (victim_score / 2).max(5),
        xp: (u64::from(victim_level) * 5).max(60),
    }
}

/// Restores the baseline upgradeable stats shared by fresh joins and soft resets.
pub fn reset_combat_stats(player: &mut Player, tuning: &PlayerTuning, projectile: &ProjectileTuning) {
    player.max_hp = tuning.max_hp;
    player.hp = tuning.max_hp;
    player.speed = tuning.speed;
    player.regen = tuning.regen;
    player.fire_cooldown = tuning.fire_cooldown;
    player.bullet_speed = projectile.speed;
    player.bullet_life = projectile.life_time;
    player.damage_bonus = 0.0;
}

/// Death penalty: halves score and xp, drops one level, resets stats and moves to `spawn`.
pub fn soft_reset_on_death(
    player: &mut Player,
    spawn: (f32, f32),
    tuning: &PlayerTuning,
    projectile: &ProjectileTuning,
) {
    player.score /= 2;
    player.xp /= 2;
    player.level = player.level.saturating_sub(1).max(1);

    reset_combat_stats(player, tuning, projectile);
    apply_tier(player);

    player.xp_to_level = calc_xp_to_level(player.level);
    player.xp = player.xp.min(player.xp_to_level - 1);

    player.x = spawn.0;
    player.y = spawn.1;
    player.last_shot = None;
}
