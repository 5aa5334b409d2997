//! Collision primitives
//!
//! Bodies are either circles or axis-aligned boxes. Each entity kind sticks
//! to one primitive for the whole run (the theme decides for the player and
//! enemies; shots, explosions and pickups are always circles), and every
//! pairing has exactly one test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision shape centered on an entity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Hitbox {
    Circle { radius: f32 },
    /// Axis-aligned box with the given half extents
    Box { half: Vec2 },
}

impl Hitbox {
    /// Radius of the smallest circle enclosing the shape
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Hitbox::Circle { radius } => radius,
            Hitbox::Box { half } => half.length(),
        }
    }
}

/// Test two shapes for overlap. Touching edges do not count.
pub fn overlaps(a_pos: Vec2, a: Hitbox, b_pos: Vec2, b: Hitbox) -> bool {
    match (a, b) {
        (Hitbox::Circle { radius: ra }, Hitbox::Circle { radius: rb }) => {
            circle_circle(a_pos, ra, b_pos, rb)
        }
        (Hitbox::Box { half: ha }, Hitbox::Box { half: hb }) => box_box(a_pos, ha, b_pos, hb),
        (Hitbox::Circle { radius }, Hitbox::Box { half }) => circle_box(a_pos, radius, b_pos, half),
        (Hitbox::Box { half }, Hitbox::Circle { radius }) => circle_box(b_pos, radius, a_pos, half),
    }
}

#[inline]
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

#[inline]
pub fn box_box(a: Vec2, ha: Vec2, b: Vec2, hb: Vec2) -> bool {
    let d = (a - b).abs();
    d.x < ha.x + hb.x && d.y < ha.y + hb.y
}

/// Circle against box: distance from the circle center to the closest
/// point of the box.
pub fn circle_box(center: Vec2, radius: f32, box_center: Vec2, half: Vec2) -> bool {
    let closest = center.clamp(box_center - half, box_center + half);
    center.distance(closest) < radius
}

/// Whether a body is touched by a blast of the given radius
pub fn in_blast(blast: Vec2, blast_radius: f32, body_pos: Vec2, body: Hitbox) -> bool {
    overlaps(blast, Hitbox::Circle { radius: blast_radius }, body_pos, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle() {
        let a = Hitbox::Circle { radius: 5.0 };
        let b = Hitbox::Circle { radius: 15.0 };
        assert!(overlaps(Vec2::ZERO, a, Vec2::ZERO, b));
        assert!(overlaps(Vec2::ZERO, a, Vec2::new(19.9, 0.0), b));
        // Exactly touching is a miss
        assert!(!overlaps(Vec2::ZERO, a, Vec2::new(20.0, 0.0), b));
    }

    #[test]
    fn test_box_box() {
        let a = Hitbox::Box { half: Vec2::splat(10.0) };
        assert!(overlaps(Vec2::ZERO, a, Vec2::new(19.0, 19.0), a));
        assert!(!overlaps(Vec2::ZERO, a, Vec2::new(19.0, 21.0), a));
    }

    #[test]
    fn test_circle_box_corner() {
        let circle = Hitbox::Circle { radius: 5.0 };
        let square = Hitbox::Box { half: Vec2::splat(10.0) };
        // Diagonal from the corner at (10, 10): distance sqrt(2) * 4 ~ 5.66
        assert!(!overlaps(Vec2::new(14.0, 14.0), circle, Vec2::ZERO, square));
        // Straight out from an edge
        assert!(overlaps(Vec2::new(14.0, 0.0), circle, Vec2::ZERO, square));
        // Argument order doesn't matter
        assert!(overlaps(Vec2::ZERO, square, Vec2::new(14.0, 0.0), circle));
    }

    #[test]
    fn test_circle_inside_box() {
        let circle = Hitbox::Circle { radius: 1.0 };
        let square = Hitbox::Box { half: Vec2::splat(10.0) };
        // Closest point is the center itself, distance 0
        assert!(overlaps(Vec2::new(2.0, -3.0), circle, Vec2::ZERO, square));
    }

    #[test]
    fn test_in_blast() {
        let body = Hitbox::Circle { radius: 20.0 };
        assert!(in_blast(Vec2::ZERO, 60.0, Vec2::new(70.0, 0.0), body));
        assert!(!in_blast(Vec2::ZERO, 60.0, Vec2::new(90.0, 0.0), body));
    }

    #[test]
    fn test_bounding_radius() {
        let b = Hitbox::Box { half: Vec2::new(3.0, 4.0) };
        assert!((b.bounding_radius() - 5.0).abs() < 1e-6);
    }
}
