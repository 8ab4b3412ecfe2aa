//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod common;
mod holder;
mod items;
mod player;
mod stations;

pub use common::*;
pub use holder::*;
pub use items::*;
pub use player::*;
pub use stations::*;
