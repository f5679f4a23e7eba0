//! Angle normalization and scalar range helpers.
//!
//! The simulation works in degrees throughout; these helpers keep angle
//! arithmetic inside well-defined windows and bound the precision of values
//! that feed comparisons.

/// Spawn/containment slack used when placing objects next to each other.
pub const EPSILON: f64 = 0.01;

/// Normalize an angle difference to (-180, 180].
pub fn to_degrees_delta(degrees: f64) -> f64 {
    let deg = degrees % 360.0;
    if deg <= -180.0 {
        deg + 360.0
    } else if deg > 180.0 {
        deg - 360.0
    } else {
        deg
    }
}

/// Normalize an angle to [0, 360).
pub fn to_positive_degrees_delta(degrees: f64) -> f64 {
    let deg = degrees % 360.0;
    if deg < 0.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// Round to 4 decimal digits. Keeps derived values stable enough to compare.
pub fn limit_precision(value: f64) -> f64 {
    (value * 1e4).round() / 1e4
}

pub fn cap_to_range(from: f64, to: f64, value: f64) -> f64 {
    value.clamp(from, to)
}

/// Map `value` from the `from` range onto the `to` range, linearly.
pub fn lerp(from: (f64, f64), to: (f64, f64), value: f64) -> f64 {
    let (f0, f1) = from;
    let (t0, t1) = to;
    t0 + (value - f0) * (t1 - t0) / (f1 - f0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_degrees_delta_window() {
        assert_eq!(to_degrees_delta(0.0), 0.0);
        assert_eq!(to_degrees_delta(180.0), 180.0);
        assert_eq!(to_degrees_delta(-180.0), 180.0);
        assert_eq!(to_degrees_delta(190.0), -170.0);
        assert_eq!(to_degrees_delta(-190.0), 170.0);
        assert_eq!(to_degrees_delta(720.0), 0.0);
        assert_eq!(to_degrees_delta(540.0), 180.0);
    }

    #[test]
    fn test_to_positive_degrees_delta_window() {
        assert_eq!(to_positive_degrees_delta(0.0), 0.0);
        assert_eq!(to_positive_degrees_delta(-90.0), 270.0);
        assert_eq!(to_positive_degrees_delta(450.0), 90.0);
        assert_eq!(to_positive_degrees_delta(360.0), 0.0);
        assert_eq!(to_positive_degrees_delta(-360.0), 0.0);
    }

    #[test]
    fn test_limit_precision() {
        assert_eq!(limit_precision(1.23456789), 1.2346);
        assert_eq!(limit_precision(-0.00004), -0.0);
        assert_eq!(limit_precision(10.0), 10.0);
    }

    #[test]
    fn test_lerp_ranges() {
        assert_eq!(lerp((-1.0, 1.0), (-500.0, 500.0), 0.0), 0.0);
        assert_eq!(lerp((-1.0, 1.0), (-500.0, 500.0), 1.0), 500.0);
        assert_eq!(lerp((-1.0, 1.0), (-500.0, 500.0), -0.5), -250.0);
        assert_eq!(lerp((0.0, 10.0), (0.0, 1.0), 2.5), 0.25);
    }

    #[test]
    fn test_cap_to_range() {
        assert_eq!(cap_to_range(0.0, 1.0, 0.5), 0.5);
        assert_eq!(cap_to_range(0.0, 1.0, -2.0), 0.0);
        assert_eq!(cap_to_range(0.0, 1.0, 2.0), 1.0);
    }
}
