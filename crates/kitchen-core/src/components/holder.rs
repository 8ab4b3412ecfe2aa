//! Holder capability - anything that can carry at most one kitchen item.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Attachment point the rendering side should parent a held item to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// Top surface of a station
    CounterTop,
    /// The player's hold point
    HoldPoint,
}

/// Capability of holding exactly zero or one kitchen item.
///
/// Only the transfer protocol in [`crate::systems::transfer`] calls the
/// mutating methods; everything else reads.
pub trait ObjectHolder {
    fn held_item(&self) -> Option<Entity>;

    fn set_item(&mut self, item: Entity);

    fn clear_item(&mut self);

    fn follow_anchor(&self) -> Anchor;
}

/// Holder component carried by every station and by the player
#[derive(Debug, Clone, Copy)]
pub struct Holder {
    item: Option<Entity>,
    anchor: Anchor,
}

impl Holder {
    pub fn counter_top() -> Self {
        Self {
            item: None,
            anchor: Anchor::CounterTop,
        }
    }

    pub fn hands() -> Self {
        Self {
            item: None,
            anchor: Anchor::HoldPoint,
        }
    }
}

impl ObjectHolder for Holder {
    fn held_item(&self) -> Option<Entity> {
        self.item
    }

    fn set_item(&mut self, item: Entity) {
        self.item = Some(item);
    }

    fn clear_item(&mut self) {
        self.item = None;
    }

    fn follow_anchor(&self) -> Anchor {
        self.anchor
    }
}
