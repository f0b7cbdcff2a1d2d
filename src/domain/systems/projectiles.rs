use crate::domain::factory::random_point;
use crate::domain::geometry::{circles_overlap, point_in_obstacle};
use crate::domain::state::{FirePattern, Player, Projectile};
use crate::domain::systems::progression::{award, kill_reward, soft_reset_on_death};
use crate::domain::tuning::ArenaTuning;
use crate::domain::world::{Kill, TickOutcome, World};
use rand::Rng;
use tracing::debug;

/// Spawns the player's shot pattern if firing and off cooldown. Returns shots spawned.
pub fn try_fire(
    p: &mut Player,
    now: f64,
    next_projectile_id: &mut u64,
    projectiles: &mut Vec<Projectile>,
    dual_offset: f32,
) -> usize {
    if !p.input.wants_fire() {
        return 0;
    }
    let ready = p
        .last_shot
        .is_none_or(|last| now - last >= f64::from(p.fire_cooldown));
    if !ready {
        return 0;
    }

    // Forward vector (same convention as the facing angle).
    let dir_x = p.angle.cos();
    let dir_y = p.angle.sin();
    // Spawn at the edge of the player's circle.
    let origin_x = p.x + dir_x * p.size;
    let origin_y = p.y + dir_y * p.size;

    let (offsets, count) = match p.pattern {
        FirePattern::Single => ([0.0, 0.0], 1),
        FirePattern::Dual => ([-dual_offset, dual_offset], 2),
    };

    for &offset in &offsets[..count] {
        // Perpendicular to the facing axis.
        let x = origin_x - dir_y * offset;
        let y = origin_y + dir_x * offset;
        projectiles.push(Projectile {
            id: *next_projectile_id,
            owner_id: p.id,
            x,
            y,
            vx: dir_x * p.bullet_speed,
            vy: dir_y * p.bullet_speed,
            radius: p.bullet_size,
            life: p.bullet_life,
            damage: p.damage,
        });
        *next_projectile_id = next_projectile_id.wrapping_add(1);
    }

    p.last_shot = Some(now);
    count
}

/// Moves every projectile, expires old ones and resolves at most one hit each.
/// Obstacles are tested before players.
pub fn tick_projectiles<R: Rng>(
    world: &mut World,
    rng: &mut R,
    dt: f32,
    now: f64,
    tuning: &ArenaTuning,
    outcome: &mut TickOutcome,
) {
    // Iterate from the back so swap_remove never skips an unvisited projectile.
    for i in (0..world.projectiles.len()).rev() {
        let shot = &mut world.projectiles[i];
        shot.x += shot.vx * dt;
        shot.y += shot.vy * dt;
        shot.life -= dt;
        if shot.life <= 0.0 {
            world.projectiles.swap_remove(i);
            continue;
        }

        let shot = world.projectiles[i].clone();
        let hit = hit_obstacle(world, &shot, now, tuning, outcome)
            || hit_player(world, rng, &shot, tuning, outcome);
        if hit {
            world.projectiles.swap_remove(i);
        }
    }
}

fn hit_obstacle(
    world: &mut World,
    shot: &Projectile,
    now: f64,
    tuning: &ArenaTuning,
    outcome: &mut TickOutcome,
) -> bool {
    let World {
        players,
        obstacles,
        respawns,
        ..
    } = world;

    let Some(obstacle) = obstacles
        .iter_mut()
        .find(|o| !o.is_destroyed() && point_in_obstacle(shot.x, shot.y, o))
    else {
        return false;
    };

    obstacle.hp -= shot.damage;
    if obstacle.hp <= 0.0 {
        obstacle.hp = 0.0;
        respawns.insert(obstacle.id, now + tuning.obstacle.respawn_seconds);
        outcome.destroyed.push(obstacle.id);

        // The shooter may have disconnected; the obstacle still breaks.
        if let Some(owner) = players.get_mut(&shot.owner_id) {
            let levels = award(owner, obstacle.shape.reward());
            outcome.push_levels(owner.id, levels);
        }
        debug!(
            obstacle_id = obstacle.id,
            shooter_id = shot.owner_id,
            "obstacle destroyed"
        );
    }
    true
}

fn hit_player<R: Rng>(
    world: &mut World,
    rng: &mut R,
    shot: &Projectile,
    tuning: &ArenaTuning,
    outcome: &mut TickOutcome,
) -> bool {
    let Some(target) = world
        .players
        .values_mut()
        .find(|t| t.id != shot.owner_id && circles_overlap(shot.circle(), t.circle()))
    else {
        return false;
    };

    target.hp -= shot.damage;
    debug!(
        victim_id = target.id,
        shooter_id = shot.owner_id,
        projectile_id = shot.id,
        victim_hp = target.hp,
        "player hit"
    );
    if target.hp > 0.0 {
        return true;
    }

    let victim_id = target.id;
    let reward = kill_reward(target.score, target.level);
    let spawn = random_point(rng, &tuning.world);
    soft_reset_on_death(target, spawn, &tuning.player, &tuning.projectile);

    let killer_id = world.players.get_mut(&shot.owner_id).map(|shooter| {
        let levels = award(shooter, reward);
        outcome.push_levels(shooter.id, levels);
        shooter.id
    });
    outcome.kills.push(Kill {
        victim_id,
        killer_id,
    });
    true
}
