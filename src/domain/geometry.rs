//! Point containment and circle contact tests for arena shapes.
//!
//! All functions are pure. Degenerate normals (zero distance between centres) fall back to
//! [`FALLBACK_NORMAL`] so callers never divide by zero.

use crate::domain::state::{Circle, Obstacle, ObstacleShape};

/// Direction used when two centres coincide.
pub const FALLBACK_NORMAL: (f32, f32) = (1.0, 0.0);

/// Vertical half-extent factor of the hexagon approximation (sin 60°, truncated).
const HEX_HALF_HEIGHT: f32 = 0.866;

/// Returns true when `(px, py)` lies inside the obstacle's shape.
///
/// Hexagons use a rectangle approximation (`|dx| <= s/2`, `|dy| <= s/2 * 0.866`) rather than
/// a true hexagon test; clients render hit feedback against the same approximation.
pub fn point_in_obstacle(px: f32, py: f32, obstacle: &Obstacle) -> bool {
    match obstacle.shape {
        ObstacleShape::Rect { w, h } => {
            px >= obstacle.x && px <= obstacle.x + w && py >= obstacle.y && py <= obstacle.y + h
        }
        ObstacleShape::Hex { size } => {
            let half = size / 2.0;
            (px - obstacle.x).abs() <= half && (py - obstacle.y).abs() <= half * HEX_HALF_HEIGHT
        }
    }
}

/// Strict overlap: centre distance less than the sum of radii.
pub fn circles_overlap(a: Circle, b: Circle) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt() < a.r + b.r
}

/// Unit vector pointing from `from` to `to`, plus the distance between them.
pub fn direction(from: (f32, f32), to: (f32, f32)) -> ((f32, f32), f32) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist > 0.0 {
        ((dx / dist, dy / dist), dist)
    } else {
        (FALLBACK_NORMAL, 0.0)
    }
}

/// Penetration of a circle into an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the rectangle towards the circle centre.
    pub normal: (f32, f32),
    pub depth: f32,
}

/// Nearest-point contact between a circle and the rectangle at `(x, y)` with size `w x h`.
pub fn circle_rect_contact(circle: Circle, x: f32, y: f32, w: f32, h: f32) -> Option<Contact> {
    let nearest = (circle.x.clamp(x, x + w), circle.y.clamp(y, y + h));
    let (normal, dist) = direction(nearest, (circle.x, circle.y));
    if dist < circle.r {
        Some(Contact {
            normal,
            depth: circle.r - dist,
        })
    } else {
        None
    }
}
