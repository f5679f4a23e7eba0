//! Chain gun ammo selection, loading and firing.
//!
//! Loading is a continuous value in [0, 1]. The fraction left over when a
//! load completes carries into the next one, so very high rates of fire
//! stay accurate across ticks.

use broadside_logic::angles::{cap_to_range, lerp, to_positive_degrees_delta, EPSILON};
use broadside_logic::xy::XY;
use rand::Rng;

use crate::model::{
    ChainGun, ChainGunDesign, Magazine, ObjectKind, ProjectileKind, ShipState, SmartPilotMode,
    SpaceObject, PROJECTILE_KINDS,
};
use crate::space::SpaceManager;

use super::reactor::try_spend_energy;

/// Normal sample by Box-Muller. The clamp keeps `ln` away from zero.
fn gaussian(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2 = rng.gen::<f64>();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Cycles the ammo selection: from nothing, the first enabled kind; from a
/// kind, the next enabled one in the fixed kind order.
fn next_enabled_kind(
    design: &ChainGunDesign,
    current: Option<ProjectileKind>,
) -> Option<ProjectileKind> {
    let enabled: Vec<ProjectileKind> = PROJECTILE_KINDS
        .iter()
        .copied()
        .filter(|&kind| design.uses(kind))
        .collect();
    match current.and_then(|kind| enabled.iter().position(|&k| k == kind)) {
        Some(index) => enabled.get((index + 1) % enabled.len()).copied(),
        None => enabled.first().copied(),
    }
}

/// Picks the first enabled kind with stock when nothing is selected.
pub fn switch_to_available_ammo(chain_gun: &mut ChainGun, magazine: &Magazine) {
    if chain_gun.projectile.is_none() {
        chain_gun.projectile = magazine.first_available(&chain_gun.design);
    }
}

/// Changes how the shell range is chosen. Target mode needs a weapons
/// target; an actual mode switch resets the manual range knob.
pub fn set_shell_range_mode(state: &mut ShipState, value: SmartPilotMode) {
    if value == SmartPilotMode::Target && state.weapons_target_id.is_none() {
        log::error!("attempt to set shell range mode to Target with no target");
        return;
    }
    if value != state.chain_gun.shell_range_mode {
        state.chain_gun.shell_range_mode = value;
        state.chain_gun.shell_range = 0.0;
    }
}

/// Recomputes how long this tick's shells should fly. The design override
/// wins; otherwise the range mode picks a base range and the manual knob
/// shifts it within the design band.
pub fn calc_shell_seconds_to_live(
    chain_gun: &mut ChainGun,
    ship_position: XY,
    target_position: Option<XY>,
) {
    let design = &chain_gun.design;
    if design.override_seconds_to_live > 0.0 {
        chain_gun.shell_seconds_to_live = design.override_seconds_to_live;
        return;
    }
    let aim_range = (design.max_shell_range - design.min_shell_range) / 2.0;
    let base_range = match chain_gun.shell_range_mode {
        SmartPilotMode::Direct => design.min_shell_range + aim_range,
        SmartPilotMode::Target => match target_position {
            Some(target) => cap_to_range(
                design.min_shell_range,
                design.max_shell_range,
                (target - ship_position).length(),
            ),
            // the target pointer soft-fails between refreshes
            None => design.min_shell_range + aim_range,
        },
        SmartPilotMode::Velocity => unreachable!("shell range has no Velocity mode"),
    };
    let range = cap_to_range(
        design.min_shell_range,
        design.max_shell_range,
        base_range + lerp((-1.0, 1.0), (-aim_range, aim_range), chain_gun.shell_range),
    );
    chain_gun.shell_seconds_to_live = range / design.bullet_speed;
}

/// One loader tick: ammo change commands, then load or unload progress
/// gated by energy and magazine stock.
pub fn update_chain_gun(state: &mut ShipState, delta_seconds: f64) {
    let ShipState {
        chain_gun,
        magazine,
        reactor,
        ..
    } = state;
    // a selection the design cannot fire schedules an ammo change
    if let Some(kind) = chain_gun.projectile {
        if !chain_gun.design.uses(kind) {
            chain_gun.change_projectile_command = true;
        }
    }
    if chain_gun.change_projectile_command {
        chain_gun.change_projectile_command = false;
        chain_gun.projectile = next_enabled_kind(&chain_gun.design, chain_gun.projectile);
    }
    if chain_gun.effectiveness() == 0.0 {
        chain_gun.is_firing = false;
    }
    if !chain_gun.is_firing {
        chain_gun.loading_remainder = 0.0;
    }
    let dont_load = match chain_gun.projectile {
        Some(kind) => chain_gun.loading == 0.0 && magazine.count(kind) < 1,
        None => false,
    };
    let loading_delta = chain_gun.design.bullets_per_second
        * chain_gun.rate_of_fire_factor
        * chain_gun.effectiveness()
        * delta_seconds;
    let loading_energy = chain_gun.design.bullets_per_second
        * chain_gun.effectiveness()
        * delta_seconds
        * chain_gun.design.energy_cost;
    if loading_delta <= 0.0 {
        return;
    }
    let unloading = match chain_gun.loaded_projectile {
        Some(loaded) => chain_gun.projectile != Some(loaded) || !chain_gun.load_ammo,
        None => false,
    };
    if unloading {
        if try_spend_energy(reactor, loading_energy) {
            chain_gun.loading -= loading_delta;
            if chain_gun.loading <= 0.0 {
                chain_gun.loading = 0.0;
                if let Some(loaded) = chain_gun.loaded_projectile.take() {
                    *magazine.count_mut(loaded) += 1;
                }
            }
        }
    } else if let Some(kind) = chain_gun.projectile {
        if chain_gun.load_ammo && chain_gun.loading < 1.0 && !dont_load {
            if try_spend_energy(reactor, loading_energy) {
                if chain_gun.loading == 0.0 {
                    *magazine.count_mut(kind) -= 1;
                    chain_gun.loaded_projectile = Some(kind);
                    chain_gun.loading += chain_gun.loading_remainder;
                    chain_gun.loading_remainder = 0.0;
                }
                chain_gun.loading += loading_delta;
                if chain_gun.loading >= 1.0 {
                    chain_gun.loading_remainder = chain_gun.loading - 1.0;
                    chain_gun.loading = 1.0;
                }
            }
        }
    }
}

/// Fires one round when a loaded gun is firing: stages a projectile just
/// off the hull along a deviation-sampled fire angle.
pub fn fire_chain_gun(
    state: &mut ShipState,
    ship: &SpaceObject,
    space: &mut SpaceManager,
    rng: &mut impl Rng,
) {
    let chain_gun = &mut state.chain_gun;
    if chain_gun.effectiveness() <= 0.0 || !chain_gun.is_firing || chain_gun.loading < 1.0 {
        return;
    }
    let Some(model) = chain_gun.loaded_projectile.take() else {
        return;
    };
    chain_gun.loading = 0.0;
    let design = model.design();
    let angle = to_positive_degrees_delta(gaussian(
        rng,
        ship.angle + chain_gun.angle + chain_gun.angle_offset,
        chain_gun.design.bullet_degrees_deviation,
    ));
    let position = ship.position
        + XY::by_length_and_direction(ship.radius + design.radius + EPSILON, angle)
        + XY::by_length_and_direction(design.radius * 2.0, angle);
    let id = space.make_id("shell");
    let mut projectile = SpaceObject::projectile(id, position, model);
    projectile.angle = angle;
    projectile.velocity =
        ship.velocity + XY::by_length_and_direction(chain_gun.design.bullet_speed, angle);
    if let ObjectKind::Projectile {
        seconds_to_live,
        target_id,
        ..
    } = &mut projectile.kind
    {
        match design.homing {
            Some(homing) => {
                *target_id = state.weapons_target_id.clone();
                *seconds_to_live = homing.seconds_to_live;
            }
            None => *seconds_to_live = chain_gun.shell_seconds_to_live,
        }
    }
    space.insert(projectile);
}
