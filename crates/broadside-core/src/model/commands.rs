//! Commands and records exchanged between the simulation and its
//! collaborators.

use broadside_logic::xy::XY;
use serde::{Deserialize, Serialize};

/// Queued object-creation and steering commands. Queues are drained once per
/// tick; a command issued during a tick takes effect the following tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAsteroid {
    pub position: XY,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExplosion {
    pub position: XY,
    pub damage_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWaypoint {
    pub position: XY,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub ids: Vec<String>,
    pub delta: XY,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotOrderCommand {
    pub ids: Vec<String>,
    pub order: BotOrder,
}

/// The authoritative directive for a ship. Set by command, cleared by the
/// read-once resolve query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BotOrder {
    None,
    Move { position: XY },
    Attack { target_id: String },
    Follow { target_id: String },
}

impl Default for BotOrder {
    fn default() -> Self {
        BotOrder::None
    }
}

/// Direct kinematic commands in wire form, for collaborators that batch
/// them. Each maps onto one immediate space-manager mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpaceCommand {
    ChangeTurnSpeed { id: String, delta: f64 },
    SetTurnSpeed { id: String, value: f64 },
    ChangeVelocity { id: String, delta: XY },
    SetVelocity { id: String, value: XY },
}

/// One pending hit on an object, produced during collision resolution and
/// drained read-once by the owning ship's damage manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Damage {
    /// Id of the object that dealt the damage.
    pub id: String,
    pub amount: f64,
    /// Hull arc the hit landed on, as two angles in the ship's local frame.
    /// Walking counter-clockwise from the first to the second sweeps the
    /// damaged surface.
    pub damage_surface_arc: (f64, f64),
    pub damage_duration_seconds: f64,
}
