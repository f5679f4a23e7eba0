//! Gunnery assist: where a shell will detonate and whether a target is
//! inside the resulting danger zone.
//!
//! All of these are first-order predictions in the firing ship's frame. They
//! feed aiming aids, not the simulation itself.

use crate::xy::XY;

/// Everything the predictions need to know about the gun and its platform.
#[derive(Debug, Clone, Copy)]
pub struct FiringSolution {
    pub ship_position: XY,
    pub ship_velocity: XY,
    pub ship_angle: f64,
    pub ship_radius: f64,
    /// Gun bearing relative to the ship.
    pub gun_angle: f64,
    pub bullet_speed: f64,
    pub shell_seconds_to_live: f64,
    pub bullet_degrees_deviation: f64,
    pub explosion_seconds_to_live: f64,
    pub explosion_expansion_speed: f64,
}

impl FiringSolution {
    fn fire_angle(&self) -> f64 {
        self.ship_angle + self.gun_angle
    }

    fn shell_explosion_distance(&self) -> f64 {
        self.shell_seconds_to_live * self.bullet_speed
    }

    fn full_explosion_radius(&self) -> f64 {
        self.explosion_seconds_to_live * self.explosion_expansion_speed
    }
}

/// Flight time to a position at the current bullet speed.
pub fn seconds_to_target(solution: &FiringSolution, target_position: XY) -> f64 {
    (target_position - solution.ship_position).length() / solution.bullet_speed
}

/// Where the shell detonates if fired right now.
pub fn shell_explosion_location(solution: &FiringSolution) -> XY {
    let fire_angle = solution.fire_angle();
    let fire_source = solution.ship_position
        + XY::by_length_and_direction(solution.ship_radius, fire_angle);
    let fire_velocity = XY::by_length_and_direction(solution.bullet_speed, fire_angle);
    fire_source + fire_velocity.scale(solution.shell_seconds_to_live)
}

/// Where the target will be when the shell detonates, assuming both keep
/// their current velocities.
pub fn target_location_at_shell_explosion(
    solution: &FiringSolution,
    target_position: XY,
    target_velocity: XY,
) -> XY {
    let relative_velocity = target_velocity - solution.ship_velocity;
    target_position + relative_velocity.scale(solution.shell_seconds_to_live)
}

/// Radius around the predicted detonation that a target should avoid:
/// the 3-sigma angular spread at detonation distance plus the explosion's
/// full growth.
pub fn shell_danger_zone_radius(solution: &FiringSolution) -> f64 {
    let spread_degrees = 3.0 * solution.bullet_degrees_deviation;
    let spread = spread_degrees.to_radians().sin() * solution.shell_explosion_distance();
    spread + solution.full_explosion_radius()
}

/// Distance band from the ship inside which detonations can touch a target.
pub fn kill_zone_radius(solution: &FiringSolution) -> (f64, f64) {
    let distance = solution.shell_explosion_distance();
    let reach = 3.0 * solution.full_explosion_radius();
    (distance - reach, distance + reach)
}

pub fn is_target_in_kill_zone(
    solution: &FiringSolution,
    target_position: XY,
    target_velocity: XY,
) -> bool {
    let hit_location = shell_explosion_location(solution);
    let target_location =
        target_location_at_shell_explosion(solution, target_position, target_velocity);
    let aiming_error = (hit_location - target_location).length();
    aiming_error < shell_danger_zone_radius(solution)
}
