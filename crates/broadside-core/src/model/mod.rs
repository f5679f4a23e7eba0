//! State types: objects in space, per-ship subsystem trees, and the
//! command/damage payloads that flow between managers.

mod commands;
mod objects;
mod ship;
mod state;

pub use commands::*;
pub use objects::*;
pub use ship::*;
pub use state::*;
