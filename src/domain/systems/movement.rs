use crate::domain::state::Player;
use crate::domain::tuning::WorldTuning;

pub fn tick_player(p: &mut Player, dt: f32, world: &WorldTuning) {
    // direction from the four flags (+Y is down)
    let mut dir_x: f32 = 0.0;
    let mut dir_y: f32 = 0.0;
    if p.input.up {
        dir_y -= 1.0;
    }
    if p.input.down {
        dir_y += 1.0;
    }
    if p.input.left {
        dir_x -= 1.0;
    }
    if p.input.right {
        dir_x += 1.0;
    }

    // normalize so diagonals are not faster; no input keeps length 1 to avoid 0/0
    let mut len = (dir_x * dir_x + dir_y * dir_y).sqrt();
    if len == 0.0 {
        len = 1.0;
    }

    // position integrate
    p.x += dir_x / len * p.speed * dt;
    p.y += dir_y / len * p.speed * dt;
    (p.x, p.y) = world.clamp(p.x, p.y);

    // face the aim point once the client has reported one
    if p.input.aim_x != 0.0 && p.input.aim_y != 0.0 {
        p.angle = (p.input.aim_y - p.y).atan2(p.input.aim_x - p.x);
    }
}
