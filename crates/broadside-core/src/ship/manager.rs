//! The per-ship conductor: one manager per live spaceship, advancing that
//! ship's subsystems against the shared space clock.

use broadside_logic::gunnery::{self, FiringSolution};
use broadside_logic::xy::XY;
use rand::Rng;

use crate::model::{BotOrder, ProjectileKind, ShipState, SmartPilotMode, SpaceObject};
use crate::space::SpaceManager;

use super::chain_gun;
use super::damage;
use super::heat;
use super::reactor;

pub struct ShipManager {
    ship_id: String,
    pub state: ShipState,
}

impl ShipManager {
    pub fn new(ship_id: impl Into<String>) -> Self {
        let mut state = ShipState::default();
        chain_gun::switch_to_available_ammo(&mut state.chain_gun, &state.magazine);
        Self {
            ship_id: ship_id.into(),
            state,
        }
    }

    /// Restores a manager around a saved ship state.
    pub fn from_state(ship_id: impl Into<String>, state: ShipState) -> Self {
        Self {
            ship_id: ship_id.into(),
            state,
        }
    }

    pub fn ship_id(&self) -> &str {
        &self.ship_id
    }

    // --- control surface ---

    pub fn set_firing(&mut self, firing: bool) {
        self.state.chain_gun.is_firing = firing;
    }

    pub fn set_load_ammo(&mut self, load: bool) {
        self.state.chain_gun.load_ammo = load;
    }

    pub fn set_weapons_target(&mut self, target_id: Option<String>) {
        self.state.weapons_target_id = target_id;
    }

    pub fn set_shell_range_mode(&mut self, mode: SmartPilotMode) {
        chain_gun::set_shell_range_mode(&mut self.state, mode);
    }

    /// One ship tick: orders, target upkeep, then reactor, coolant, damage
    /// and the chain gun, in that order.
    pub fn update(&mut self, delta_seconds: f64, space: &mut SpaceManager, rng: &mut impl Rng) {
        self.resolve_bot_order(space);
        self.refresh_weapons_target(space);
        reactor::update_reactor(&mut self.state.reactor, delta_seconds);
        let total_coolant = self.state.design.total_coolant;
        heat::distribute_coolant(&mut self.state.systems_mut(), total_coolant, delta_seconds);
        damage::apply_space_damage(&self.ship_id, &mut self.state, space);
        let Some(ship) = space.get_object(&self.ship_id).cloned() else {
            // hull went down this tick
            return;
        };
        let target_position = self.weapons_target_position(space);
        chain_gun::calc_shell_seconds_to_live(
            &mut self.state.chain_gun,
            ship.position,
            target_position,
        );
        chain_gun::update_chain_gun(&mut self.state, delta_seconds);
        chain_gun::fire_chain_gun(&mut self.state, &ship, space, rng);
    }

    /// Takes this tick's bot order if one arrived. An attack order doubles
    /// as target designation.
    fn resolve_bot_order(&mut self, space: &mut SpaceManager) {
        if let Some(order) = space.resolve_object_order(&self.ship_id) {
            if let BotOrder::Attack { target_id } = &order {
                self.state.weapons_target_id = Some(target_id.clone());
            }
            self.state.current_order = order;
        }
    }

    /// Drops a weapons target that no longer exists and keeps the space
    /// side of the ship in sync. Losing the target while aiming at it
    /// falls the shell range back to Direct.
    fn refresh_weapons_target(&mut self, space: &mut SpaceManager) {
        if let Some(target_id) = &self.state.weapons_target_id {
            if space.get_object(target_id).is_none() {
                self.state.weapons_target_id = None;
                if self.state.chain_gun.shell_range_mode == SmartPilotMode::Target {
                    self.state.chain_gun.shell_range_mode = SmartPilotMode::Direct;
                    self.state.chain_gun.shell_range = 0.0;
                }
            }
        }
        space.set_ship_weapons_target(&self.ship_id, self.state.weapons_target_id.clone());
    }

    fn weapons_target_position(&self, space: &SpaceManager) -> Option<XY> {
        let target_id = self.state.weapons_target_id.as_ref()?;
        space.get_object(target_id).map(|target| target.position)
    }

    /// Gunnery assist: can a shell fired right now threaten the current
    /// weapons target.
    pub fn is_target_in_kill_zone(&self, space: &SpaceManager) -> bool {
        let Some(ship) = space.get_object(&self.ship_id) else {
            return false;
        };
        let Some(target_id) = &self.state.weapons_target_id else {
            return false;
        };
        let Some(target) = space.get_object(target_id) else {
            return false;
        };
        let Some(model) = self
            .state
            .chain_gun
            .loaded_projectile
            .or(self.state.chain_gun.projectile)
        else {
            return false;
        };
        let solution = self.firing_solution(ship, model);
        gunnery::is_target_in_kill_zone(&solution, target.position, target.velocity)
    }

    fn firing_solution(&self, ship: &SpaceObject, model: ProjectileKind) -> FiringSolution {
        let chain_gun = &self.state.chain_gun;
        let explosion = &model.design().explosion;
        FiringSolution {
            ship_position: ship.position,
            ship_velocity: ship.velocity,
            ship_angle: ship.angle,
            ship_radius: ship.radius,
            gun_angle: chain_gun.angle + chain_gun.angle_offset,
            bullet_speed: chain_gun.design.bullet_speed,
            shell_seconds_to_live: chain_gun.shell_seconds_to_live,
            bullet_degrees_deviation: chain_gun.design.bullet_degrees_deviation,
            explosion_seconds_to_live: explosion.seconds_to_live,
            explosion_expansion_speed: explosion.expansion_speed,
        }
    }
}
