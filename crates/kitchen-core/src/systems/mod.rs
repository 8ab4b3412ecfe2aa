//! Systems - logic that operates on components
//!
//! Station handlers live in their own modules and are reached through the
//! behaviour table in [`behavior`].

pub mod behavior;
pub mod counters;
pub mod cutting;
pub mod heating;
pub mod interaction;
mod mission;
mod orders;
pub mod plates;
mod player;
pub mod transfer;

pub use behavior::{behavior, StationBehavior};
pub use interaction::{hand_off, try_add_ingredient, HandOff, StationContext};
pub use mission::*;
pub use orders::*;
pub use player::*;
