//! Collaborators the core calls out to but does not implement
//!
//! Collision, targeting and scene changes belong to the host (game engine,
//! test harness). The core only decides what to ask and reacts to the answer.

use crate::components::Vec3;
use hecs::Entity;

/// Collision and aiming queries answered by the host's physics
pub trait SpatialQuery {
    /// Can something at `from` move `distance` along `direction` unobstructed?
    fn can_move(&self, from: Vec3, direction: Vec3, distance: f32) -> bool;

    /// Entity hit when looking from `from` along `direction` within `reach`
    fn station_in_reach(&self, from: Vec3, direction: Vec3, reach: f32) -> Option<Entity>;
}

/// Level flow commands issued when a mission finishes
pub trait SceneDirector {
    fn advance_to_next_level(&mut self, next_level: u32);

    fn return_to_menu(&mut self);
}

/// Empty floor: nothing blocks movement and nothing is ever in reach
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFloor;

impl SpatialQuery for OpenFloor {
    fn can_move(&self, _from: Vec3, _direction: Vec3, _distance: f32) -> bool {
        true
    }

    fn station_in_reach(&self, _from: Vec3, _direction: Vec3, _reach: f32) -> Option<Entity> {
        None
    }
}
