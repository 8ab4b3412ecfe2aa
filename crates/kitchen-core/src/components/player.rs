//! Player component - the single actor that carries items between stations.

use super::common::Vec3;
use hecs::Entity;

/// Player marker with movement and targeting state
#[derive(Debug, Clone)]
pub struct Player {
    /// Units per second
    pub move_speed: f32,
    /// How far ahead the player can reach a station
    pub reach: f32,
    /// Last non-zero movement direction, used for targeting
    pub facing: Vec3,
    pub walking: bool,
    /// Station currently aimed at
    pub target: Option<Entity>,
}

impl Player {
    pub fn new(move_speed: f32, reach: f32) -> Self {
        Self {
            move_speed,
            reach,
            facing: Vec3::FORWARD,
            walking: false,
            target: None,
        }
    }
}
