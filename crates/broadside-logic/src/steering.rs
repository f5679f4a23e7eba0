//! Steering controllers for self-propelled objects.
//!
//! Both controllers return normalized efforts: the caller scales them by its
//! own rotation/thrust capacity and the tick's delta. They work on a plain
//! kinematic view so guidance code stays independent of the object model.

use serde::{Deserialize, Serialize};

use crate::angles::{cap_to_range, to_degrees_delta};
use crate::xy::XY;

/// Kinematic snapshot of a steerable object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Craft {
    pub position: XY,
    pub velocity: XY,
    pub angle: f64,
    pub turn_speed: f64,
}

/// Rotation effort in [-1, 1] that turns the craft to face `target`.
///
/// The bearing error is damped by the rotation already in flight this step,
/// so a craft spinning toward the target eases off instead of overshooting.
pub fn rotate_to_target(delta_seconds: f64, craft: &Craft, target: XY) -> f64 {
    let bearing = (target - craft.position).angle_of();
    let error = to_degrees_delta(bearing - craft.angle);
    let anticipated = to_degrees_delta(error - craft.turn_speed * delta_seconds);
    cap_to_range(-1.0, 1.0, anticipated / 90.0)
}

/// Thrust effort toward a destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManeuverEffort {
    /// Forward boost in [0, 1]; falls off as the target leaves the nose cone.
    pub boost: f64,
}

pub fn move_to_target(craft: &Craft, target: XY) -> ManeuverEffort {
    let bearing = (target - craft.position).angle_of();
    let error = to_degrees_delta(bearing - craft.angle);
    ManeuverEffort {
        boost: error.to_radians().cos().max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn craft(position: XY, angle: f64, turn_speed: f64) -> Craft {
        Craft {
            position,
            velocity: XY::ZERO,
            angle,
            turn_speed,
        }
    }

    // --- rotate_to_target ---

    #[test]
    fn test_rotation_sign_follows_shortest_arc() {
        let subject = craft(XY::ZERO, 0.0, 0.0);
        assert!(rotate_to_target(0.1, &subject, XY::new(0.0, 100.0)) > 0.0);
        assert!(rotate_to_target(0.1, &subject, XY::new(0.0, -100.0)) < 0.0);
        assert_eq!(rotate_to_target(0.1, &subject, XY::new(100.0, 0.0)), 0.0);
    }

    #[test]
    fn test_rotation_saturates_on_large_errors() {
        let subject = craft(XY::ZERO, 0.0, 0.0);
        assert_eq!(rotate_to_target(0.1, &subject, XY::new(-100.0, 1.0)), 1.0);
        assert_eq!(rotate_to_target(0.1, &subject, XY::new(-100.0, -1.0)), -1.0);
    }

    #[test]
    fn test_rotation_damps_existing_spin() {
        // already spinning fast enough to cover the error this step
        let spinning = craft(XY::ZERO, 0.0, 450.0);
        let effort = rotate_to_target(0.1, &spinning, XY::new(0.0, 100.0));
        assert!(effort <= 0.5, "expected braking, got {effort}");
    }

    #[test]
    fn test_rotation_converges() {
        let mut subject = craft(XY::ZERO, 120.0, 0.0);
        let target = XY::new(100.0, 0.0);
        let dt = 0.05;
        for _ in 0..1000 {
            let effort = rotate_to_target(dt, &subject, target);
            subject.turn_speed += effort * dt * 360.0;
            subject.angle += subject.turn_speed * dt;
        }
        let error = to_degrees_delta(subject.angle);
        assert!(error.abs() < 5.0, "did not converge: {error}");
    }

    // --- move_to_target ---

    #[test]
    fn test_boost_full_when_facing_target() {
        let subject = craft(XY::ZERO, 0.0, 0.0);
        let effort = move_to_target(&subject, XY::new(100.0, 0.0));
        assert!((effort.boost - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_boost_zero_when_target_behind() {
        let subject = craft(XY::ZERO, 0.0, 0.0);
        assert_eq!(move_to_target(&subject, XY::new(-100.0, 1.0)).boost, 0.0);
        // abeam is the edge of the nose cone
        assert!(move_to_target(&subject, XY::new(0.0, 100.0)).boost < 1e-9);
    }

    #[test]
    fn test_boost_partial_off_axis() {
        let subject = craft(XY::ZERO, 0.0, 0.0);
        let effort = move_to_target(&subject, XY::new(100.0, 100.0));
        assert!(effort.boost > 0.0 && effort.boost < 1.0);
    }
}
