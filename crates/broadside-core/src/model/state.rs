//! The canonical world-state container.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::commands::{
    BotOrderCommand, CreateAsteroid, CreateExplosion, CreateWaypoint, MoveCommand,
};
use super::objects::{ObjectKind, SpaceObject};

/// All live space objects, ordered by id, plus the pending-command queues
/// collaborators write into.
///
/// Destroyed objects stay in the container (and iterable through
/// [`SpaceState::iter_destroyed`]) until the next garbage-collection pass, so
/// in-flight events can still reference them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpaceState {
    objects: BTreeMap<String, SpaceObject>,
    pub create_asteroid_commands: Vec<CreateAsteroid>,
    pub create_explosion_commands: Vec<CreateExplosion>,
    pub create_waypoint_commands: Vec<CreateWaypoint>,
    pub move_commands: Vec<MoveCommand>,
    pub bot_order_commands: Vec<BotOrderCommand>,
    /// Ids of ships destroyed this tick, for the engine to retire.
    pub destroy_spaceship_commands: Vec<String>,
}

impl SpaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&SpaceObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SpaceObject> {
        self.objects.get_mut(id)
    }

    /// Insert or replace an object under its own id.
    pub fn set(&mut self, object: SpaceObject) {
        self.objects.insert(object.id.clone(), object);
    }

    pub fn remove(&mut self, id: &str) -> Option<SpaceObject> {
        self.objects.remove(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Live objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SpaceObject> {
        self.objects.values().filter(|o| !o.destroyed)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SpaceObject> {
        self.objects.values_mut().filter(|o| !o.destroyed)
    }

    /// Objects already marked destroyed but not yet garbage collected.
    pub fn iter_destroyed(&self) -> impl Iterator<Item = &SpaceObject> {
        self.objects.values().filter(|o| o.destroyed)
    }

    pub fn explosions_mut(&mut self) -> impl Iterator<Item = &mut SpaceObject> {
        self.iter_mut()
            .filter(|o| matches!(o.kind, ObjectKind::Explosion { .. }))
    }

    pub fn projectiles_mut(&mut self) -> impl Iterator<Item = &mut SpaceObject> {
        self.iter_mut()
            .filter(|o| matches!(o.kind, ObjectKind::Projectile { .. }))
    }

    /// Live ship by id.
    pub fn get_ship(&self, id: &str) -> Option<&SpaceObject> {
        self.objects
            .get(id)
            .filter(|o| o.is_ship() && !o.destroyed)
    }

    /// Mark an object destroyed, if it is live and expendable. Destroyed
    /// ships are additionally queued for the engine to retire.
    pub fn destroy_object(&mut self, id: &str) {
        let mut destroyed_ship = false;
        if let Some(subject) = self.objects.get_mut(id) {
            if !subject.destroyed && subject.expendable {
                if subject.is_ship() {
                    destroyed_ship = true;
                }
                subject.destroyed = true;
            }
        }
        if destroyed_ship {
            self.destroy_spaceship_commands.push(id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::objects::Faction;
    use broadside_logic::xy::XY;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn scattered_field() -> Vec<SpaceObject> {
        let field_size = 80_000.0;
        let mut rng = StdRng::seed_from_u64(7);
        let mut map: Vec<SpaceObject> = (0..100)
            .map(|n| {
                SpaceObject::asteroid(
                    format!("asteroid-{n}"),
                    XY::new(
                        rng.gen::<f64>() * field_size - field_size / 2.0,
                        rng.gen::<f64>() * field_size - field_size / 2.0,
                    ),
                    120.0,
                )
            })
            .collect();
        map.push(SpaceObject::spaceship("ship-0", XY::ZERO, Faction::None));
        map
    }

    #[test]
    fn test_iterator_has_same_number_of_elements() {
        let mut uut = SpaceState::new();
        for object in scattered_field() {
            uut.set(object);
        }
        assert_eq!(uut.iter().count(), 101);
    }

    #[test]
    fn test_iterator_has_the_same_elements() {
        let mut uut = SpaceState::new();
        let mut map = scattered_field();
        for object in map.clone() {
            uut.set(object);
        }
        map.sort_by(|a, b| a.id.cmp(&b.id));
        let stored: Vec<&SpaceObject> = uut.iter().collect();
        assert_eq!(stored.len(), map.len());
        for (stored, expected) in stored.iter().zip(map.iter()) {
            assert_eq!(*stored, expected);
        }
    }

    #[test]
    fn test_destroyed_objects_leave_the_live_iterator() {
        let mut uut = SpaceState::new();
        for object in scattered_field() {
            uut.set(object);
        }
        uut.destroy_object("asteroid-3");
        assert_eq!(uut.iter().count(), 100);
        assert_eq!(uut.iter_destroyed().count(), 1);
        assert_eq!(uut.len(), 101);
    }

    #[test]
    fn test_destroying_a_ship_queues_a_retire_command() {
        let mut uut = SpaceState::new();
        uut.set(SpaceObject::spaceship("ship-1", XY::ZERO, Faction::None));
        uut.destroy_object("ship-1");
        assert_eq!(uut.destroy_spaceship_commands, vec!["ship-1".to_string()]);
        // marking again is a no-op
        uut.destroy_object("ship-1");
        assert_eq!(uut.destroy_spaceship_commands.len(), 1);
    }

    #[test]
    fn test_non_expendable_objects_resist_destroy() {
        let mut uut = SpaceState::new();
        let mut waypoint = SpaceObject::waypoint("wp-1", XY::ZERO);
        waypoint.expendable = false;
        uut.set(waypoint);
        uut.destroy_object("wp-1");
        assert!(!uut.get("wp-1").unwrap().destroyed);
    }
}
