//! Floor geometry shared by the player and the host's spatial queries.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Point or direction in kitchen space (y is up, the floor is x/z)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Default facing of a freshly spawned player
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Lift a 2D input vector onto the floor plane
    pub fn from_planar(x: f32, z: f32) -> Self {
        Self::new(x, 0.0, z)
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.z).hypot(self.y)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Unit vector in the same direction, or zero for zero input
    pub fn normalize(&self) -> Self {
        match self.length() {
            len if len > 0.0 => *self * len.recip(),
            _ => Self::ZERO,
        }
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

/// Where the player stands
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub world: Vec3,
}

impl Position {
    pub fn new(x: f32, z: f32) -> Self {
        Self {
            world: Vec3::from_planar(x, z),
        }
    }
}
