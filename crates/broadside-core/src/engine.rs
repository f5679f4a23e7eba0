//! Simulation engine - main entry point for running the simulation

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use broadside_logic::xy::XY;

use crate::model::{Faction, SpaceObject};
use crate::ship::ShipManager;
use crate::space::SpaceManager;

/// Smallest asteroid a field generator will mint.
const MIN_ASTEROID_RADIUS: f64 = 10.0;
/// Largest asteroid a field generator will mint.
const MAX_ASTEROID_RADIUS: f64 = 120.0;

/// Main simulation engine. Owns the shared space, one manager per live ship,
/// and the seeded rng that makes a run reproducible.
pub struct SpaceEngine {
    /// The world every manager reads and writes
    pub space: SpaceManager,
    /// Simulation time in seconds since start
    pub sim_time: f64,
    ships: BTreeMap<String, ShipManager>,
    rng: StdRng,
}

impl SpaceEngine {
    /// Create a new empty simulation. Two engines built from the same seed
    /// and fed the same commands stay bit-identical tick for tick.
    pub fn new(seed: u64) -> Self {
        Self {
            space: SpaceManager::new(),
            sim_time: 0.0,
            ships: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Spawn a ship and its manager. Returns false when the id is taken.
    pub fn add_ship(&mut self, id: impl Into<String>, position: XY, faction: Faction) -> bool {
        let id = id.into();
        if self.space.check_duplicate_ship(&id) {
            log::warn!("ship id {} already taken", id);
            return false;
        }
        self.space
            .insert(SpaceObject::spaceship(id.clone(), position, faction));
        self.ships.insert(id.clone(), ShipManager::new(id));
        true
    }

    /// Scatter `count` asteroids uniformly over a square of side
    /// `field_size` centered on the origin.
    pub fn add_asteroid_field(&mut self, count: usize, field_size: f64) {
        let half = field_size / 2.0;
        for _ in 0..count {
            let id = self.space.make_id("asteroid");
            let position = XY::new(
                self.rng.gen_range(-half..half),
                self.rng.gen_range(-half..half),
            );
            let radius = self.rng.gen_range(MIN_ASTEROID_RADIUS..MAX_ASTEROID_RADIUS);
            self.space.insert(SpaceObject::asteroid(id, position, radius));
        }
    }

    /// Advance the simulation by `delta_seconds`. Ships run first so their
    /// staged projectiles and damage resolutions land in the same tick the
    /// space advances; the space then moves everything and reports which
    /// ships died so their managers can be retired.
    pub fn update(&mut self, delta_seconds: f64) {
        for manager in self.ships.values_mut() {
            manager.update(delta_seconds, &mut self.space, &mut self.rng);
        }

        self.space.update(delta_seconds);

        for id in std::mem::take(&mut self.space.state.destroy_spaceship_commands) {
            if self.ships.remove(&id).is_some() {
                log::info!("retiring manager for destroyed ship {}", id);
            }
        }

        self.sim_time += delta_seconds;
    }

    /// Get current simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Count ships with live managers
    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    /// Borrow a ship's manager
    pub fn ship(&self, id: &str) -> Option<&ShipManager> {
        self.ships.get(id)
    }

    /// Mutably borrow a ship's manager
    pub fn ship_mut(&mut self, id: &str) -> Option<&mut ShipManager> {
        self.ships.get_mut(id)
    }

    /// Iterate over the ids of ships with live managers
    pub fn ship_ids(&self) -> impl Iterator<Item = &str> {
        self.ships.keys().map(String::as_str)
    }

    /// Save simulation state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), crate::persistence::SaveError> {
        crate::persistence::save_simulation(writer, &self.space, &self.ships, self.sim_time)
    }

    /// Load simulation state from a reader. The rng is left untouched, so a
    /// loaded run continues from the stream position the engine was at.
    pub fn load<R: std::io::Read>(
        &mut self,
        reader: R,
    ) -> Result<(), crate::persistence::SaveError> {
        let loaded = crate::persistence::load_simulation(reader)?;

        self.space = loaded.space;
        self.ships = loaded.ships;
        self.sim_time = loaded.sim_time;

        Ok(())
    }
}

impl Default for SpaceEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_creation() {
        let engine = SpaceEngine::new(0);
        assert_eq!(engine.ship_count(), 0);
        assert_eq!(engine.sim_time(), 0.0);
        assert!(engine.space.state.is_empty());
    }

    #[test]
    fn test_duplicate_ship_ids_are_rejected() {
        let mut engine = SpaceEngine::new(0);
        assert!(engine.add_ship("dread", XY::ZERO, Faction::Gravitas));
        assert!(!engine.add_ship("dread", XY::new(500.0, 0.0), Faction::Raiders));
        assert_eq!(engine.ship_count(), 1);
    }

    #[test]
    fn test_asteroid_fields_are_seed_stable() {
        let build = || {
            let mut engine = SpaceEngine::new(42);
            engine.add_asteroid_field(20, 5000.0);
            engine.space.snapshot()
        };

        let a = serde_json::to_string(&build()).unwrap();
        let b = serde_json::to_string(&build()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_asteroids_land_inside_the_field() {
        let mut engine = SpaceEngine::new(3);
        engine.add_asteroid_field(50, 2000.0);

        assert_eq!(engine.space.state.len(), 50);
        for object in engine.space.state.iter() {
            assert!(object.position.x.abs() <= 1000.0);
            assert!(object.position.y.abs() <= 1000.0);
            assert!(object.radius >= MIN_ASTEROID_RADIUS);
            assert!(object.radius < MAX_ASTEROID_RADIUS);
        }
    }

    #[test]
    fn test_dead_ships_lose_their_manager() {
        let mut engine = SpaceEngine::new(0);
        engine.add_ship("victim", XY::ZERO, Faction::Gravitas);

        // Strip the hull and armor so the first collision is lethal
        if let Some(ship) = engine.space.state.get_mut("victim") {
            ship.health = 1.0;
        }
        if let Some(manager) = engine.ship_mut("victim") {
            for plate in &mut manager.state.armor.plates {
                plate.health = 0.0;
            }
        }
        engine
            .space
            .insert(SpaceObject::asteroid("rock", XY::new(55.0, 0.0), 10.0));

        // First tick queues the collision damage, second tick resolves it
        engine.update(0.05);
        engine.update(0.05);

        assert_eq!(engine.ship_count(), 0);
        assert!(engine.ship("victim").is_none());
        let wreck = engine.space.state.get("victim").unwrap();
        assert!(wreck.destroyed);
    }

    #[test]
    fn test_colliding_ships_trade_scaled_arc_damage() {
        let mut engine = SpaceEngine::new(0);
        engine.add_ship("port", XY::ZERO, Faction::Gravitas);
        engine.add_ship("starboard", XY::new(90.0, 0.0), Faction::Raiders);
        // Bare hulls, so every point of collision damage reaches health
        for id in ["port", "starboard"] {
            if let Some(manager) = engine.ship_mut(id) {
                for plate in &mut manager.state.armor.plates {
                    plate.health = 0.0;
                }
            }
        }

        // First tick queues the arc damage and separates the hulls, the
        // second runs it through the armor.
        engine.update(1.0);
        engine.update(1.0);

        // Radii 50 + 50 against distance 90: overlap 10, at 50 hull damage
        // per unit of penetration.
        for id in ["port", "starboard"] {
            let ship = engine.space.get_object(id).expect("still flying");
            assert_eq!(ship.health, 500.0);
        }
        // Half-overlap correction plus one tick of elastic recoil.
        let port = engine.space.get_object("port").expect("live").position;
        let starboard = engine.space.get_object("starboard").expect("live").position;
        assert!((port.x + 5.25).abs() < 1e-9, "port at {}", port.x);
        assert!((starboard.x - 95.25).abs() < 1e-9, "starboard at {}", starboard.x);
        assert_eq!(port.y, 0.0);
        assert_eq!(starboard.y, 0.0);
    }

    #[test]
    fn test_update_advances_sim_time() {
        let mut engine = SpaceEngine::new(0);
        for _ in 0..20 {
            engine.update(1.0 / 20.0);
        }
        assert!((engine.sim_time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_seeds_give_identical_battles() {
        let run = |seed: u64| {
            let mut engine = SpaceEngine::new(seed);
            engine.add_ship("alpha", XY::ZERO, Faction::Gravitas);
            engine.add_ship("beta", XY::new(1500.0, 0.0), Faction::Raiders);
            engine.add_asteroid_field(10, 6000.0);

            if let Some(ship) = engine.ship_mut("alpha") {
                ship.set_weapons_target(Some("beta".to_string()));
                ship.set_firing(true);
            }
            if let Some(ship) = engine.ship_mut("beta") {
                ship.set_weapons_target(Some("alpha".to_string()));
                ship.set_firing(true);
            }

            for _ in 0..60 {
                engine.update(1.0 / 20.0);
            }
            serde_json::to_string(&engine.space.snapshot()).unwrap()
        };

        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }
}
