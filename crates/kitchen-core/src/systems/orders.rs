//! Order board - waiting orders and matching delivered plates against them
//!
//! Orders arrive on a timer as uniformly random recipes from the catalog.
//! A delivered plate completes the first waiting order whose ingredient set
//! equals the plate's contents.

use crate::catalog::{KindId, KitchenCatalog, RecipeId};
use crate::events::{EventBus, Notification};
use log::{debug, info};
use rand::Rng;

/// Default seconds between order spawns
pub const DEFAULT_ORDER_PERIOD: f32 = 4.0;
/// Default cap on waiting orders
pub const DEFAULT_ORDER_CAPACITY: usize = 4;

/// A recipe the kitchen still has to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitingOrder {
    pub id: u32,
    pub recipe: RecipeId,
}

/// Result of handing a plate to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Succeeded { order: u32, recipe: RecipeId },
    Failed,
}

/// Manages waiting orders
#[derive(Debug, Clone)]
pub struct OrderBoard {
    waiting: Vec<WaitingOrder>,
    spawn_timer: f32,
    spawn_period: f32,
    capacity: usize,
    successful: u32,
    next_id: u32,
}

impl Default for OrderBoard {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER_PERIOD, DEFAULT_ORDER_CAPACITY)
    }
}

impl OrderBoard {
    pub fn new(spawn_period: f32, capacity: usize) -> Self {
        Self {
            waiting: Vec::new(),
            spawn_timer: 0.0,
            spawn_period,
            capacity,
            successful: 0,
            next_id: 0,
        }
    }

    /// Advance the spawn timer. Returns the order spawned this tick, if any.
    pub fn tick(
        &mut self,
        delta: f32,
        catalog: &KitchenCatalog,
        rng: &mut impl Rng,
        bus: &mut EventBus,
    ) -> Option<WaitingOrder> {
        self.spawn_timer -= delta;
        if self.spawn_timer > 0.0 {
            return None;
        }
        self.spawn_timer = self.spawn_period;

        let recipes = catalog.recipes();
        if recipes.is_empty() {
            return None;
        }
        let recipe = recipes[rng.gen_range(0..recipes.len())].id;
        self.push_order(recipe, catalog, bus)
    }

    /// Queue a specific recipe, respecting the cap
    pub fn push_order(
        &mut self,
        recipe: RecipeId,
        catalog: &KitchenCatalog,
        bus: &mut EventBus,
    ) -> Option<WaitingOrder> {
        if self.waiting.len() >= self.capacity {
            debug!("order board full, skipping spawn");
            return None;
        }
        let order = WaitingOrder {
            id: self.next_id,
            recipe,
        };
        self.next_id += 1;
        self.waiting.push(order);
        info!(
            "order #{} waiting: {}",
            order.id,
            catalog.recipe(recipe).map_or("?", |r| r.name.as_str())
        );
        bus.publish(Notification::OrderSpawned {
            order: order.id,
            recipe,
        });
        Some(order)
    }

    /// Match plate contents against waiting orders, first in line wins
    pub fn deliver(
        &mut self,
        contents: &[KindId],
        catalog: &KitchenCatalog,
        bus: &mut EventBus,
    ) -> DeliveryOutcome {
        let matched = self.waiting.iter().position(|order| {
            catalog
                .recipe(order.recipe)
                .map_or(false, |recipe| recipe.matches(contents))
        });

        let Some(index) = matched else {
            info!("delivery failed: no order matches {} ingredients", contents.len());
            bus.publish(Notification::DeliveryFailed);
            return DeliveryOutcome::Failed;
        };

        let order = self.waiting.remove(index);
        self.successful += 1;
        info!("order #{} delivered ({} total)", order.id, self.successful);
        bus.publish(Notification::OrderCompleted {
            order: order.id,
            recipe: order.recipe,
        });
        bus.publish(Notification::DeliverySucceeded {
            recipe: order.recipe,
        });
        DeliveryOutcome::Succeeded {
            order: order.id,
            recipe: order.recipe,
        }
    }

    pub fn waiting(&self) -> &[WaitingOrder] {
        &self.waiting
    }

    pub fn successful_deliveries(&self) -> u32 {
        self.successful
    }

    pub fn reset(&mut self) {
        self.waiting.clear();
        self.spawn_timer = 0.0;
        self.successful = 0;
        self.next_id = 0;
    }
}
