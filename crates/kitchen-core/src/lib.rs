//! Kitchen Core - Cooking Game Simulation Engine
//!
//! The rules of a small restaurant kitchen: ingredients move between counters
//! and the player's hands, get cut, fried and burned, are assembled on plates,
//! and are delivered against randomly arriving orders while a mission clock
//! runs down.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Stations, kitchen items (ingredients and plates), the player
//! - **Components**: Pure data attached to entities (Holder, KitchenItem, Stove, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Rendering, audio and input stay outside. They read [`events::Notification`]s
//! and answer the [`external::SpatialQuery`] and [`external::SceneDirector`] traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use kitchen_core::prelude::*;
//!
//! let json = std::fs::read_to_string("data/kitchen_catalog.json").unwrap();
//! let catalog = KitchenCatalog::from_json(&json).unwrap();
//! let mut kitchen = Kitchen::new(catalog, SessionConfig::default());
//!
//! let board = kitchen.add_station(StationKind::Cutting, "board").unwrap();
//! kitchen.spawn_player(Position::new(0.0, 0.0));
//! kitchen.set_target(Some(board)).unwrap();
//!
//! loop {
//!     kitchen.update(1.0 / 60.0).unwrap(); // 60 FPS
//!     for notification in kitchen.events.drain() {
//!         println!("{:?}", notification);
//!     }
//! }
//! ```

pub mod catalog;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod external;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::catalog::{KindId, KitchenCatalog, RecipeId};
    pub use crate::components::*;
    pub use crate::config::{LevelLayout, SessionConfig, StationSetup};
    pub use crate::engine::{Kitchen, PlayerCommand};
    pub use crate::error::KitchenError;
    pub use crate::events::{EventBus, EventKind, Notification};
    pub use crate::external::{OpenFloor, SceneDirector, SpatialQuery};
    pub use crate::systems::{DeliveryOutcome, MissionState, WaitingOrder};
    pub use hecs::Entity;
}
