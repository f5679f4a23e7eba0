//! Broadside Core - Space Combat Simulation Engine
//!
//! A deterministic, tick-driven simulation of newtonian space combat:
//! ships, projectiles, explosions and asteroids drifting, colliding and
//! shooting at each other on a shared 2D plane.
//!
//! # Architecture
//!
//! The simulation is split into layers that only talk downward:
//! - **Model**: replicated state (space objects, per-ship subsystem trees,
//!   command and damage payloads)
//! - **Space**: the shared world manager (motion, rigid attachment cliques,
//!   collisions, fields of view, garbage collection)
//! - **Ship**: per-ship managers (reactor, heat, armor damage, chain gun)
//! - **Engine**: the façade that conducts ships and space each tick
//!
//! # Example
//!
//! ```rust,no_run
//! use broadside_core::prelude::*;
//! use broadside_logic::xy::XY;
//!
//! let mut engine = SpaceEngine::new(42);
//!
//! // Populate a battlefield
//! engine.add_ship("player", XY::ZERO, Faction::Gravitas);
//! engine.add_asteroid_field(30, 10_000.0);
//!
//! // Run simulation
//! loop {
//!     engine.update(1.0 / 20.0); // 20 ticks per second
//! }
//! ```

pub mod model;
pub mod space;
pub mod ship;
pub mod engine;
pub mod persistence;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::SpaceEngine;
    pub use crate::model::*;
    pub use crate::ship::ShipManager;
    pub use crate::space::SpaceManager;
}
