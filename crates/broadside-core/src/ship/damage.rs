//! Hull damage resolution and system degradation.
//!
//! Collision contact arrives from space as [`Damage`] records carrying the
//! local surface arc that was hit. The arc is mapped onto the armor plate
//! ring; whatever the plates cannot absorb leaks through to hull health.

use broadside_logic::angles::to_positive_degrees_delta;

use crate::model::{Armor, Damage, ShipState, ShipSystem};
use crate::space::SpaceManager;

/// Grinds a system's efficiency down. `damage50` is the amount that takes
/// an undamaged system to half efficiency.
pub fn damage_system(system: &mut dyn ShipSystem, amount: f64) {
    let factor = system.efficiency_factor() - amount / (2.0 * system.damage50());
    *system.efficiency_factor_mut() = factor.clamp(0.0, 1.0);
}

/// Plate indices under a local-frame arc, walking counter-clockwise from
/// the arc's start. The ring wraps, so indices are taken modulo the plate
/// count and deduplicated.
fn plates_in_arc(num_plates: usize, degrees_per_plate: f64, arc: (f64, f64)) -> Vec<usize> {
    let (from, to) = arc;
    let span = to_positive_degrees_delta(to - from);
    let first = (from / degrees_per_plate).floor() as i64;
    let last = ((from + span) / degrees_per_plate).floor() as i64;
    let mut plates = Vec::new();
    for index in first..=last {
        let plate = index.rem_euclid(num_plates as i64) as usize;
        if !plates.contains(&plate) {
            plates.push(plate);
        }
    }
    plates
}

/// Applies one damage record to the armor ring: the plates under the arc
/// split the amount evenly. Returns the damage the plates could not hold.
pub fn apply_to_armor(armor: &mut Armor, damage: &Damage) -> f64 {
    let hit_plates = plates_in_arc(
        armor.plates.len(),
        armor.degrees_per_plate(),
        damage.damage_surface_arc,
    );
    if hit_plates.is_empty() {
        return 0.0;
    }
    let per_plate = damage.amount / hit_plates.len() as f64;
    let mut hull_spill = 0.0;
    for plate_index in hit_plates {
        let plate = &mut armor.plates[plate_index];
        plate.health -= per_plate;
        if plate.health < 0.0 {
            hull_spill -= plate.health;
            plate.health = 0.0;
        }
    }
    hull_spill
}

/// Drains this ship's pending damage queue and runs every record through
/// the armor. Spill reaches hull health; a hull at or below zero destroys
/// the ship.
pub fn apply_space_damage(ship_id: &str, state: &mut ShipState, space: &mut SpaceManager) {
    for damage in space.resolve_object_damage(ship_id) {
        let hull_spill = apply_to_armor(&mut state.armor, &damage);
        if hull_spill > 0.0 {
            if let Some(health) = space.damage_object_health(ship_id, hull_spill) {
                if health <= 0.0 {
                    log::info!("{} hull destroyed by {}", ship_id, damage.id);
                    space.destroy_object(ship_id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use broadside_logic::xy::XY;

    use crate::model::{ChainGun, SpaceObject};

    use super::*;

    fn record(amount: f64, arc: (f64, f64)) -> Damage {
        Damage {
            id: "hit-1".into(),
            amount,
            damage_surface_arc: arc,
            damage_duration_seconds: 0.05,
        }
    }

    #[test]
    fn test_damage_system_halves_at_damage50() {
        let mut gun = ChainGun::default();
        let damage50 = gun.design.damage50;
        damage_system(&mut gun, damage50);
        assert!((gun.efficiency_factor - 0.5).abs() < 1e-9);
        damage_system(&mut gun, damage50 * 2.0);
        assert_eq!(gun.efficiency_factor, 0.0);
    }

    #[test]
    fn test_arc_damage_splits_across_plates() {
        // 60 plates, 6 degrees each; the arc [0, 12) covers plates 0..=2.
        let mut armor = Armor::default();
        let spill = apply_to_armor(&mut armor, &record(90.0, (0.0, 12.0)));
        assert_eq!(spill, 0.0);
        assert_eq!(armor.plates[0].health, 170.0);
        assert_eq!(armor.plates[1].health, 170.0);
        assert_eq!(armor.plates[2].health, 170.0);
        assert_eq!(armor.plates[3].health, 200.0);
    }

    #[test]
    fn test_wrapping_arc_crosses_plate_zero() {
        let mut armor = Armor::default();
        apply_to_armor(&mut armor, &record(30.0, (354.0, 6.0)));
        assert_eq!(armor.plates[59].health, 190.0);
        assert_eq!(armor.plates[0].health, 190.0);
        assert_eq!(armor.plates[1].health, 190.0);
        assert_eq!(armor.plates[2].health, 200.0);
    }

    #[test]
    fn test_broken_plates_spill_to_the_hull() {
        let mut armor = Armor::default();
        armor.plates[0].health = 10.0;
        armor.plates[1].health = 10.0;
        let spill = apply_to_armor(&mut armor, &record(100.0, (0.0, 12.0)));
        // 100 over three plates; the two weak ones hold 10 each.
        let per_plate = 100.0 / 3.0;
        assert!((spill - 2.0 * (per_plate - 10.0)).abs() < 1e-9);
        assert_eq!(armor.plates[0].health, 0.0);
        assert_eq!(armor.plates[1].health, 0.0);
    }

    #[test]
    fn test_collision_damage_lands_on_the_facing_plates() {
        let mut space = SpaceManager::new();
        space.insert(SpaceObject::spaceship(
            "ship-a",
            XY::ZERO,
            crate::model::Faction::Gravitas,
        ));
        space.insert(SpaceObject::asteroid("rock", XY::new(59.0, 0.0), 10.0));
        space.update(0.05);

        let mut state = ShipState::default();
        apply_space_damage("ship-a", &mut state, &mut space);
        let total: f64 = state.armor.plates.iter().map(|p| p.health).sum();
        assert!(total < 60.0 * 200.0);
        // the struck arc faces the asteroid; the far side is untouched
        assert_eq!(state.armor.plates[30].health, 200.0);
        // fresh plates hold everything, so the hull is unharmed
        assert_eq!(space.get_object("ship-a").map(|o| o.health), Some(1000.0));
    }

    #[test]
    fn test_hull_collapse_destroys_the_ship() {
        let mut space = SpaceManager::new();
        let mut ship =
            SpaceObject::spaceship("ship-a", XY::ZERO, crate::model::Faction::Gravitas);
        ship.health = 5.0;
        space.insert(ship);
        space.insert(SpaceObject::asteroid("rock", XY::new(59.0, 0.0), 10.0));
        space.update(0.05);

        let mut state = ShipState::default();
        for plate in &mut state.armor.plates {
            plate.health = 0.0;
        }
        apply_space_damage("ship-a", &mut state, &mut space);
        assert!(space.get_object("ship-a").is_none());
        assert!(space
            .state
            .get("ship-a")
            .map(|o| o.destroyed)
            .unwrap_or(false));
    }
}
