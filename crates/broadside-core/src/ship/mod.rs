//! Per-ship subsystem managers: reactor, heat, armor damage and the chain
//! gun, conducted once per tick by [`ShipManager`].

mod chain_gun;
mod damage;
mod heat;
mod manager;
mod reactor;

pub use chain_gun::*;
pub use damage::*;
pub use heat::*;
pub use manager::*;
pub use reactor::*;
