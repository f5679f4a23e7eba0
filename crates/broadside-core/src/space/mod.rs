//! The space layer: spatial indexing, rigid attachments, visibility, and
//! the tick pipeline that drives everything in the world.

mod attachments;
mod collisions;
mod fov;
mod manager;
mod spatial;

pub use attachments::*;
pub use collisions::*;
pub use fov::*;
pub use manager::*;
pub use spatial::*;
