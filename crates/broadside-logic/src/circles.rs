//! Circle-circle geometry.

use crate::xy::XY;

/// The two points where the perimeters of two overlapping circles cross.
///
/// Returns `None` for disjoint, contained, or concentric circles. Tangent
/// circles yield two identical points.
pub fn circles_intersection(
    center_a: XY,
    radius_a: f64,
    center_b: XY,
    radius_b: f64,
) -> Option<[XY; 2]> {
    let between = center_b - center_a;
    let distance = between.length();
    if distance == 0.0 {
        return None;
    }
    if distance > radius_a + radius_b {
        return None;
    }
    if distance < (radius_a - radius_b).abs() {
        return None;
    }
    // distance from center_a to the chord connecting the crossing points
    let along =
        (radius_a * radius_a - radius_b * radius_b + distance * distance) / (2.0 * distance);
    let height_squared = radius_a * radius_a - along * along;
    if height_squared < 0.0 {
        return None;
    }
    let height = height_squared.sqrt();
    let middle = center_a + between.scale(along / distance);
    let offset = XY::new(
        between.y / distance * height,
        -between.x / distance * height,
    );
    Some([middle + offset, middle - offset])
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRACE: f64 = 1e-9;

    #[test]
    fn test_overlapping_circles_cross_twice() {
        let points =
            circles_intersection(XY::ZERO, 50.0, XY::new(90.0, 0.0), 50.0).expect("overlap");
        for p in points {
            assert!((p.distance(&XY::ZERO) - 50.0).abs() < GRACE);
            assert!((p.distance(&XY::new(90.0, 0.0)) - 50.0).abs() < GRACE);
        }
        assert!((points[0].x - 45.0).abs() < GRACE);
        assert!((points[1].x - 45.0).abs() < GRACE);
        assert!((points[0].y + points[1].y).abs() < GRACE);
    }

    #[test]
    fn test_crossing_points_face_the_other_circle() {
        // walking from the first point to the second counter-clockwise
        // sweeps the arc that faces the other circle
        let [p0, p1] = circles_intersection(XY::ZERO, 50.0, XY::new(90.0, 0.0), 50.0).unwrap();
        assert!(p0.y < 0.0);
        assert!(p1.y > 0.0);

        let [q0, q1] = circles_intersection(XY::ZERO, 50.0, XY::new(0.0, 90.0), 50.0).unwrap();
        assert!(q0.x > 0.0);
        assert!(q1.x < 0.0);
    }

    #[test]
    fn test_disjoint_and_contained_and_concentric() {
        assert!(circles_intersection(XY::ZERO, 1.0, XY::new(10.0, 0.0), 1.0).is_none());
        assert!(circles_intersection(XY::ZERO, 10.0, XY::new(1.0, 0.0), 2.0).is_none());
        assert!(circles_intersection(XY::ZERO, 5.0, XY::ZERO, 3.0).is_none());
    }

    #[test]
    fn test_tangent_circles_touch_once() {
        let points =
            circles_intersection(XY::ZERO, 5.0, XY::new(10.0, 0.0), 5.0).expect("tangent");
        assert!((points[0].x - 5.0).abs() < GRACE);
        assert!(points[0].y.abs() < GRACE);
        assert!((points[0].x - points[1].x).abs() < GRACE);
    }
}
