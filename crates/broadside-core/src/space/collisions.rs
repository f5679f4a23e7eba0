//! Circle-circle overlap and segment-circle raycast tests.
//!
//! Everything in space is a circle, so these two primitives are the whole
//! narrow phase.

use broadside_logic::xy::XY;

/// Result of an overlapping circle pair, oriented from `a` toward `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResponse {
    /// Penetration depth.
    pub overlap: f64,
    /// Unit vector pointing from `a`'s center toward `b`'s center.
    pub overlap_n: XY,
    /// `overlap_n` scaled by `overlap`.
    pub overlap_v: XY,
    /// `a` lies entirely inside `b`.
    pub a_in_b: bool,
    /// `b` lies entirely inside `a`.
    pub b_in_a: bool,
}

/// Overlap test for two circles. Touching circles do not count as colliding.
pub fn circle_circle(
    a_center: XY,
    a_radius: f64,
    b_center: XY,
    b_radius: f64,
) -> Option<CollisionResponse> {
    let between = b_center - a_center;
    let distance = between.length();
    if distance >= a_radius + b_radius {
        return None;
    }
    let overlap = a_radius + b_radius - distance;
    // Concentric circles have no meaningful direction; push along +x.
    let overlap_n = if distance > 0.0 {
        between * (1.0 / distance)
    } else {
        XY::new(1.0, 0.0)
    };
    Some(CollisionResponse {
        overlap,
        overlap_n,
        overlap_v: overlap_n * overlap,
        a_in_b: distance + a_radius <= b_radius,
        b_in_a: distance + b_radius <= a_radius,
    })
}

/// Fraction along the segment `origin..dest` at which it first enters the
/// circle, if it does. A segment starting inside the circle reports no hit,
/// so an already-overlapping body does not pin a mover in place.
pub fn ray_circle(origin: XY, dest: XY, center: XY, radius: f64) -> Option<f64> {
    let to_origin = origin - center;
    if to_origin.length_squared() < radius * radius {
        return None;
    }
    let direction = dest - origin;
    let a = direction.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * direction.dot(&to_origin);
    let c = to_origin.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    // Smallest root in [0, 1] is the entry point.
    let t0 = (-b - sqrt_d) / (2.0 * a);
    if (0.0..=1.0).contains(&t0) {
        return Some(t0);
    }
    let t1 = (-b + sqrt_d) / (2.0 * a);
    if (0.0..=1.0).contains(&t1) {
        return Some(t1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separated_circles_do_not_collide() {
        assert!(circle_circle(XY::ZERO, 1.0, XY::new(3.0, 0.0), 1.0).is_none());
        // Exactly touching is not a collision either.
        assert!(circle_circle(XY::ZERO, 1.0, XY::new(2.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_overlap_points_from_a_to_b() {
        let res = circle_circle(XY::ZERO, 2.0, XY::new(3.0, 0.0), 2.0)
            .expect("circles overlap");
        assert!((res.overlap - 1.0).abs() < 1e-9);
        assert_eq!(res.overlap_n, XY::new(1.0, 0.0));
        assert_eq!(res.overlap_v, XY::new(1.0, 0.0));
        assert!(!res.a_in_b);
        assert!(!res.b_in_a);
    }

    #[test]
    fn test_containment_flags() {
        let res = circle_circle(XY::new(1.0, 0.0), 1.0, XY::ZERO, 5.0)
            .expect("small circle inside big circle");
        assert!(res.a_in_b);
        assert!(!res.b_in_a);

        let res = circle_circle(XY::ZERO, 5.0, XY::new(1.0, 0.0), 1.0)
            .expect("big circle around small circle");
        assert!(!res.a_in_b);
        assert!(res.b_in_a);
    }

    #[test]
    fn test_concentric_circles_fall_back_to_x_axis() {
        let res = circle_circle(XY::ZERO, 1.0, XY::ZERO, 2.0).expect("concentric");
        assert_eq!(res.overlap_n, XY::new(1.0, 0.0));
        assert!((res.overlap - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ray_hits_circle_at_entry_point() {
        let t = ray_circle(XY::ZERO, XY::new(10.0, 0.0), XY::new(5.0, 0.0), 1.0)
            .expect("segment crosses circle");
        assert!((t - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_ray_misses_circle() {
        assert!(ray_circle(XY::ZERO, XY::new(10.0, 0.0), XY::new(5.0, 3.0), 1.0).is_none());
        // Circle behind the segment.
        assert!(ray_circle(XY::ZERO, XY::new(10.0, 0.0), XY::new(-5.0, 0.0), 1.0).is_none());
        // Circle beyond the segment's end.
        assert!(ray_circle(XY::ZERO, XY::new(1.0, 0.0), XY::new(5.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_from_inside_reports_no_hit() {
        assert!(ray_circle(XY::ZERO, XY::new(10.0, 0.0), XY::new(0.5, 0.0), 2.0).is_none());
    }

    #[test]
    fn test_zero_length_ray() {
        assert!(ray_circle(XY::new(5.0, 5.0), XY::new(5.0, 5.0), XY::ZERO, 1.0).is_none());
    }
}
