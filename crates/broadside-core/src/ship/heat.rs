//! System heat bookkeeping and coolant distribution.

use crate::model::ShipSystem;

use super::damage::damage_system;

/// Heat a system can hold before the excess starts burning it.
pub const MAX_SYSTEM_HEAT: f64 = 100.0;

/// Adds heat to a system. Heat past the maximum is clamped and the excess
/// converts one-to-one into system damage.
pub fn add_heat(system: &mut dyn ShipSystem, value: f64) {
    *system.heat_mut() += value;
    let heat = system.heat();
    if heat > MAX_SYSTEM_HEAT {
        let excess = heat - MAX_SYSTEM_HEAT;
        *system.heat_mut() = MAX_SYSTEM_HEAT;
        log::debug!("{} overheated, taking {} damage", system.name(), excess);
        damage_system(system, excess);
    }
}

/// Removes heat from a system, flooring at zero.
pub fn reduce_heat(system: &mut dyn ShipSystem, value: f64) {
    let heat = system.heat();
    if heat > 0.0 {
        *system.heat_mut() = (heat - value).max(0.0);
    }
}

/// Spreads the ship's coolant flow over its systems for one tick. Each
/// coolant unit removes one heat per second. With no priorities set the
/// flow splits evenly; otherwise it follows each system's coolant factor.
pub fn distribute_coolant(
    systems: &mut [&mut dyn ShipSystem],
    total_coolant: f64,
    delta_seconds: f64,
) {
    let total_factors: f64 = systems.iter().map(|s| s.coolant_factor()).sum();
    if total_factors == 0.0 {
        let per_system = total_coolant / systems.len() as f64;
        for system in systems.iter_mut() {
            reduce_heat(*system, per_system * delta_seconds);
        }
    } else {
        let per_factor = total_coolant / total_factors;
        for system in systems.iter_mut() {
            let share = system.coolant_factor() * per_factor;
            reduce_heat(*system, share * delta_seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::ShipState;

    use super::*;

    #[test]
    fn test_overheat_converts_to_damage() {
        let mut state = ShipState::default();
        add_heat(&mut state.chain_gun, 130.0);
        assert_eq!(state.chain_gun.heat, MAX_SYSTEM_HEAT);
        // 30 excess against damage50 = 20
        let expected = 1.0 - 30.0 / (2.0 * state.chain_gun.design.damage50);
        assert!((state.chain_gun.efficiency_factor - expected).abs() < 1e-9);
    }

    #[test]
    fn test_reduce_heat_floors_at_zero() {
        let mut state = ShipState::default();
        state.reactor.heat = 3.0;
        reduce_heat(&mut state.reactor, 10.0);
        assert_eq!(state.reactor.heat, 0.0);
    }

    #[test]
    fn test_even_split_when_no_priorities() {
        let mut state = ShipState::default();
        state.chain_gun.heat = 10.0;
        state.magazine.heat = 10.0;
        state.reactor.heat = 10.0;
        let total_coolant = state.design.total_coolant;
        distribute_coolant(&mut state.systems_mut(), total_coolant, 1.0);
        assert_eq!(state.chain_gun.heat, 8.0);
        assert_eq!(state.magazine.heat, 8.0);
        assert_eq!(state.reactor.heat, 8.0);
    }

    #[test]
    fn test_priority_split_follows_factors() {
        let mut state = ShipState::default();
        state.chain_gun.heat = 10.0;
        state.magazine.heat = 10.0;
        state.reactor.heat = 10.0;
        state.chain_gun.coolant_factor = 1.0;
        state.reactor.coolant_factor = 2.0;
        let total_coolant = state.design.total_coolant;
        distribute_coolant(&mut state.systems_mut(), total_coolant, 1.0);
        // 6 coolant split 1:0:2 over the factors
        assert_eq!(state.chain_gun.heat, 8.0);
        assert_eq!(state.magazine.heat, 10.0);
        assert_eq!(state.reactor.heat, 6.0);
    }
}
