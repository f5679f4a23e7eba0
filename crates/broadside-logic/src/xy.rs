//! 2D vectors with a degree-based angle convention.
//!
//! Angles are measured in degrees, counter-clockwise, with 0 pointing along
//! +x and 90 along +y. All simulation geometry shares this convention.

use serde::{Deserialize, Serialize};

use crate::angles::to_positive_degrees_delta;

/// 2D vector (f64)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct XY {
    pub x: f64,
    pub y: f64,
}

impl XY {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of the given length pointing in the given direction (degrees).
    pub fn by_length_and_direction(length: f64, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self {
            x: length * radians.cos(),
            y: length * radians.sin(),
        }
    }

    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Same direction, given length. The zero vector stays zero.
    pub fn normalized_to(&self, length: f64) -> Self {
        let current = self.length();
        if current > 0.0 {
            self.scale(length / current)
        } else {
            Self::ZERO
        }
    }

    /// Rotate counter-clockwise by `degrees`.
    pub fn rotate(&self, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Direction of the vector in degrees, in [0, 360). The zero vector
    /// reports 0.
    pub fn angle_of(&self) -> f64 {
        to_positive_degrees_delta(self.y.atan2(self.x).to_degrees())
    }

    /// True when both components are within `threshold` of zero.
    pub fn is_zero(&self, threshold: f64) -> bool {
        self.x.abs() <= threshold && self.y.abs() <= threshold
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }
}

impl std::ops::Add for XY {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for XY {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Neg for XY {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl std::ops::Mul<f64> for XY {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl std::ops::AddAssign for XY {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::to_degrees_delta;

    const GRACE: f64 = 0.1;

    #[test]
    fn test_xy_operations() {
        let a = XY::new(1.0, 2.0);
        let b = XY::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 8.0);

        let diff = b - a;
        assert_eq!(diff.x, 3.0);
        assert_eq!(diff.y, 4.0);
        assert_eq!(diff.length(), 5.0);

        let scaled = a * 2.0;
        assert_eq!(scaled.x, 2.0);
        assert_eq!(scaled.y, 4.0);
    }

    #[test]
    fn test_normalized_to() {
        let v = XY::new(3.0, 4.0);
        let n = v.normalized_to(10.0);
        assert!((n.length() - 10.0).abs() < 0.001);
        assert_eq!(XY::ZERO.normalized_to(5.0), XY::ZERO);
    }

    #[test]
    fn test_angle_of_sanity_cases() {
        assert!((XY::new(1.0, 0.0).angle_of() - 0.0).abs() < GRACE);
        assert!((XY::new(1.0, 1.0).angle_of() - 45.0).abs() < GRACE);
        assert!((XY::new(0.0, 1.0).angle_of() - 90.0).abs() < GRACE);
        assert!((XY::new(-1.0, 1.0).angle_of() - 135.0).abs() < GRACE);
        assert!((XY::new(-1.0, 0.0).angle_of() - 180.0).abs() < GRACE);
        assert!((XY::new(-1.0, -1.0).angle_of() - 225.0).abs() < GRACE);
        assert!((XY::new(0.0, -1.0).angle_of() - 270.0).abs() < GRACE);
        assert!((XY::new(1.0, -1.0).angle_of() - 315.0).abs() < GRACE);
    }

    #[test]
    fn test_angle_of_complies_with_rotate() {
        for deg in (-720..=720).step_by(37) {
            let deg = deg as f64;
            let rotated = XY::new(1.0, 0.0).rotate(deg);
            let err = to_degrees_delta(rotated.angle_of() - deg);
            assert!(err.abs() < GRACE, "vector rotated {deg} degrees: {err}");
        }
    }

    #[test]
    fn test_by_length_and_direction() {
        for deg in [-180.0, -90.0, 0.0, 33.0, 90.0, 179.0] {
            let vec = XY::by_length_and_direction(7.5, deg);
            assert!((vec.length() - 7.5).abs() < GRACE);
            let err = to_degrees_delta(vec.angle_of() - deg);
            assert!(err.abs() < GRACE, "direction {deg}: {err}");
        }
    }

    #[test]
    fn test_is_zero_threshold() {
        assert!(XY::new(0.0, 0.0).is_zero(0.0));
        assert!(XY::new(0.5, -0.5).is_zero(0.5));
        assert!(!XY::new(0.6, 0.0).is_zero(0.5));
    }
}
