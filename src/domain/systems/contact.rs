// Player contact with obstacles and with other players.

use crate::domain::geometry::{circle_rect_contact, circles_overlap, direction, point_in_obstacle};
use crate::domain::state::{Obstacle, ObstacleShape, Player, PlayerId};
use crate::domain::tuning::{ObstacleTuning, PlayerTuning, WorldTuning};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
pub struct ContactConfig {
    pub obstacle_dps: f32,
    pub hex_push: f32,
    pub collision_dps: f32,
    pub collision_push: f32,
}

impl ContactConfig {
    pub fn new(player: &PlayerTuning, obstacle: &ObstacleTuning) -> Self {
        Self {
            obstacle_dps: player.obstacle_dps,
            hex_push: obstacle.hex_push,
            collision_dps: player.collision_dps,
            collision_push: player.collision_push,
        }
    }
}

/// Pushes a penetrating player out of a rectangle and applies contact damage.
pub fn resolve_circle_rect_contact(
    p: &mut Player,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    dt: f32,
    dps: f32,
) {
    if let Some(contact) = circle_rect_contact(p.circle(), x, y, w, h) {
        p.hp -= dps * dt;
        p.x += contact.normal.0 * contact.depth;
        p.y += contact.normal.1 * contact.depth;
    }
}

/// Runs every live obstacle against the player.
pub fn resolve_obstacle_contacts(
    p: &mut Player,
    obstacles: &[Obstacle],
    dt: f32,
    cfg: ContactConfig,
    world: &WorldTuning,
) {
    for o in obstacles.iter().filter(|o| !o.is_destroyed()) {
        match o.shape {
            ObstacleShape::Rect { w, h } => {
                resolve_circle_rect_contact(p, o.x, o.y, w, h, dt, cfg.obstacle_dps);
            }
            ObstacleShape::Hex { .. } => {
                if point_in_obstacle(p.x, p.y, o) {
                    p.hp -= cfg.obstacle_dps * dt;
                    let (normal, _) = direction((o.x, o.y), (p.x, p.y));
                    p.x += normal.0 * cfg.hex_push;
                    p.y += normal.1 * cfg.hex_push;
                }
            }
        }
        (p.x, p.y) = world.clamp(p.x, p.y);
    }
}

/// Pushes `id` and every player overlapping it apart; only `id` takes damage.
///
/// Called once per player per tick, so each overlapping pair is resolved from both sides.
pub fn resolve_player_overlaps(
    id: PlayerId,
    players: &mut BTreeMap<PlayerId, Player>,
    dt: f32,
    cfg: ContactConfig,
    world: &WorldTuning,
) {
    let Some(current) = players.get(&id) else {
        return;
    };
    let mut me = current.circle();
    let mut damage = 0.0;

    for (other_id, other) in players.iter_mut() {
        if *other_id == id {
            continue;
        }
        if !circles_overlap(me, other.circle()) {
            continue;
        }

        let (normal, _) = direction((other.x, other.y), (me.x, me.y));
        (me.x, me.y) = world.clamp(
            me.x + normal.0 * cfg.collision_push,
            me.y + normal.1 * cfg.collision_push,
        );
        (other.x, other.y) = world.clamp(
            other.x - normal.0 * cfg.collision_push,
            other.y - normal.1 * cfg.collision_push,
        );
        damage += cfg.collision_dps * dt;
    }

    if let Some(current) = players.get_mut(&id) {
        current.x = me.x;
        current.y = me.y;
        current.hp -= damage;
    }
}
