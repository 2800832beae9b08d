//! Collision detection primitives shared by every game
//!
//! Everything works in canvas pixel space (origin top-left, y down).
//! Normals always point from the obstacle toward the moving body so that
//! `reflect_velocity` bounces it away.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the obstacle (if hit)
    pub point: Vec2,
    /// Surface normal at contact, pointing toward the body
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Strict AABB overlap (touching edges do not count)
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.pos.x + b.size.x
        && a.pos.x + a.size.x > b.pos.x
        && a.pos.y < b.pos.y + b.size.y
        && a.pos.y + a.size.y > b.pos.y
}

/// Inclusive point-in-rectangle test
#[inline]
pub fn point_in_rect(p: Vec2, rect: &Rect) -> bool {
    p.x >= rect.pos.x
        && p.x <= rect.pos.x + rect.size.x
        && p.y >= rect.pos.y
        && p.y <= rect.pos.y + rect.size.y
}

/// Distance test used by the games that collide on "closer than N"
#[inline]
pub fn within(a: Vec2, b: Vec2, distance: f32) -> bool {
    a.distance_squared(b) < distance * distance
}

/// Circle against circle; the normal points from `b` toward `a`
pub fn circle_circle(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> CollisionResult {
    let delta = a - b;
    let dist = delta.length();
    let reach = radius_a + radius_b;
    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
    CollisionResult {
        hit: true,
        point: b + normal * radius_b,
        normal,
        penetration: reach - dist,
    }
}

/// Circle against an axis-aligned rectangle
pub fn circle_rect(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = center.clamp(rect.min(), rect.max());
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > f32::EPSILON {
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Centre is inside the rectangle: push out along the shallowest axis
    let (normal, depth) = inside_push(center - rect.center(), rect.size * 0.5);
    CollisionResult {
        hit: true,
        point: center - normal * depth,
        normal,
        penetration: depth + radius,
    }
}

/// Circle against a rectangle rotated by `angle` radians about its centre
///
/// The circle is moved into the rectangle's local frame, resolved there as
/// an AABB test, and the result rotated back out.
pub fn circle_rotated_rect(
    center: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
    angle: f32,
) -> CollisionResult {
    let rot = Vec2::from_angle(angle);
    let local = Vec2::from_angle(-angle).rotate(center - rect_center);

    let local_rect = Rect::from_center(Vec2::ZERO, half_extents * 2.0);
    let result = circle_rect(local, radius, &local_rect);
    if !result.hit {
        return result;
    }

    CollisionResult {
        hit: true,
        point: rect_center + rot.rotate(result.point),
        normal: rot.rotate(result.normal),
        penetration: result.penetration,
    }
}

fn inside_push(offset: Vec2, half: Vec2) -> (Vec2, f32) {
    let dx = half.x - offset.x.abs();
    let dy = half.y - offset.y.abs();
    if dx < dy {
        (Vec2::new(offset.x.signum(), 0.0), dx)
    } else {
        (Vec2::new(0.0, offset.y.signum()), dy)
    }
}

/// Reflect a velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_aabb_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(aabb_overlap(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges do not overlap
        assert!(!aabb_overlap(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!aabb_overlap(&a, &Rect::new(20.0, 20.0, 1.0, 1.0)));
    }

    #[test]
    fn test_point_in_rect() {
        let r = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(point_in_rect(Vec2::new(10.0, 10.0), &r));
        assert!(point_in_rect(Vec2::new(30.0, 15.0), &r));
        assert!(!point_in_rect(Vec2::new(31.0, 12.0), &r));
    }

    #[test]
    fn test_circle_circle() {
        let hit = circle_circle(Vec2::new(15.0, 0.0), 10.0, Vec2::ZERO, 10.0);
        assert!(hit.hit);
        assert!((hit.penetration - 5.0).abs() < 1e-4);
        assert!((hit.normal - Vec2::X).length() < 1e-4);

        let miss = circle_circle(Vec2::new(25.0, 0.0), 10.0, Vec2::ZERO, 10.0);
        assert!(!miss.hit);
    }

    #[test]
    fn test_circle_rect_side() {
        let rect = Rect::new(0.0, 100.0, 100.0, 20.0);
        // Ball above the top edge, overlapping by 3
        let result = circle_rect(Vec2::new(50.0, 95.0), 8.0, &rect);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(0.0, -1.0)).length() < 1e-4);
        assert!((result.penetration - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_rect_inside() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        let result = circle_rect(Vec2::new(50.0, 2.0), 5.0, &rect);
        assert!(result.hit);
        assert!(result.normal.y < 0.0);
    }

    #[test]
    fn test_circle_rotated_rect() {
        // A 45° ramp; a ball sitting on its upper face along the local normal
        let half = Vec2::new(100.0, 10.0);
        let up_local = Vec2::new(0.0, -1.0);
        let up = Vec2::from_angle(FRAC_PI_4).rotate(up_local);
        let ball = Vec2::new(400.0, 300.0) + up * 20.0;

        let result = circle_rotated_rect(ball, 15.0, Vec2::new(400.0, 300.0), half, FRAC_PI_4);
        assert!(result.hit);
        assert!((result.normal - up).length() < 1e-3);
        assert!((result.penetration - 5.0).abs() < 1e-3);

        let far = circle_rotated_rect(
            ball + up * 50.0,
            15.0,
            Vec2::new(400.0, 300.0),
            half,
            FRAC_PI_4,
        );
        assert!(!far.hit);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    proptest! {
        #[test]
        fn prop_circle_circle_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            ra in 1.0f32..50.0, rb in 1.0f32..50.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let ab = circle_circle(a, ra, b, rb);
            let ba = circle_circle(b, rb, a, ra);
            prop_assert_eq!(ab.hit, ba.hit);
            if ab.hit {
                prop_assert!(ab.penetration >= 0.0);
                prop_assert!((ab.penetration - ba.penetration).abs() < 1e-3);
            }
        }

        #[test]
        fn prop_aabb_overlap_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0, aw in 1.0f32..50.0, ah in 1.0f32..50.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0, bw in 1.0f32..50.0, bh in 1.0f32..50.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(aabb_overlap(&a, &b), aabb_overlap(&b, &a));
        }

        #[test]
        fn prop_circle_rect_penetration_non_negative(
            cx in -50.0f32..150.0, cy in -50.0f32..150.0, r in 1.0f32..30.0,
        ) {
            let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
            let result = circle_rect(Vec2::new(cx, cy), r, &rect);
            if result.hit {
                prop_assert!(result.penetration >= 0.0);
                prop_assert!((result.normal.length() - 1.0).abs() < 1e-3);
            }
        }

        #[test]
        fn prop_reflect_preserves_speed(vx in -100.0f32..100.0, vy in -100.0f32..100.0, a in 0.0f32..6.28) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::from_angle(a);
            let r = reflect_velocity(v, n);
            prop_assert!((r.length() - v.length()).abs() < 1e-2);
        }
    }
}
