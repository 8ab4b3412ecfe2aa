//! Event bus - notifications the core publishes for audio, UI and visuals
//!
//! Every emitter publishes into one [`EventBus`]. Subscribers register a
//! handler for one [`EventKind`] (or for everything) and get an id back to
//! unsubscribe with. Published notifications are also kept in a pending log
//! that hosts can drain once per frame instead of subscribing.

use crate::catalog::{KindId, RecipeId};
use crate::components::HeatingPhase;
use crate::systems::MissionState;
use hecs::Entity;

/// Something observable that happened inside the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// An item landed on a holder (station or player)
    ObjectPlaced { holder: Entity, item: Entity },
    /// The player picked an item up
    PickedUp { player: Entity, item: Entity },
    /// A cut was performed on a cutting station
    Cut { station: Entity },
    HeatingStateChanged { station: Entity, phase: HeatingPhase },
    /// Normalized 0..1 progress of a cutting or heating station
    ProgressChanged { emitter: Entity, progress: f32 },
    IngredientAdded { plate: Entity, kind: KindId },
    Dispensed { station: Entity, kind: KindId },
    ObjectTrashed { station: Entity },
    PlateSpawned { station: Entity },
    PlateRemoved { station: Entity },
    OrderSpawned { order: u32, recipe: RecipeId },
    OrderCompleted { order: u32, recipe: RecipeId },
    DeliverySucceeded { recipe: RecipeId },
    DeliveryFailed,
    MissionStateChanged { state: MissionState },
    GamePaused,
    GameUnpaused,
    /// The mission counted another successful delivery
    RecipeSuccess { delivered: u32, goal: u32 },
    SelectedStationChanged { player: Entity, station: Option<Entity> },
    LevelTransition { next_level: u32 },
}

/// Discriminant of [`Notification`], used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ObjectPlaced,
    PickedUp,
    Cut,
    HeatingStateChanged,
    ProgressChanged,
    IngredientAdded,
    Dispensed,
    ObjectTrashed,
    PlateSpawned,
    PlateRemoved,
    OrderSpawned,
    OrderCompleted,
    DeliverySucceeded,
    DeliveryFailed,
    MissionStateChanged,
    GamePaused,
    GameUnpaused,
    RecipeSuccess,
    SelectedStationChanged,
    LevelTransition,
}

impl Notification {
    pub fn kind(&self) -> EventKind {
        match self {
            Notification::ObjectPlaced { .. } => EventKind::ObjectPlaced,
            Notification::PickedUp { .. } => EventKind::PickedUp,
            Notification::Cut { .. } => EventKind::Cut,
            Notification::HeatingStateChanged { .. } => EventKind::HeatingStateChanged,
            Notification::ProgressChanged { .. } => EventKind::ProgressChanged,
            Notification::IngredientAdded { .. } => EventKind::IngredientAdded,
            Notification::Dispensed { .. } => EventKind::Dispensed,
            Notification::ObjectTrashed { .. } => EventKind::ObjectTrashed,
            Notification::PlateSpawned { .. } => EventKind::PlateSpawned,
            Notification::PlateRemoved { .. } => EventKind::PlateRemoved,
            Notification::OrderSpawned { .. } => EventKind::OrderSpawned,
            Notification::OrderCompleted { .. } => EventKind::OrderCompleted,
            Notification::DeliverySucceeded { .. } => EventKind::DeliverySucceeded,
            Notification::DeliveryFailed => EventKind::DeliveryFailed,
            Notification::MissionStateChanged { .. } => EventKind::MissionStateChanged,
            Notification::GamePaused => EventKind::GamePaused,
            Notification::GameUnpaused => EventKind::GameUnpaused,
            Notification::RecipeSuccess { .. } => EventKind::RecipeSuccess,
            Notification::SelectedStationChanged { .. } => EventKind::SelectedStationChanged,
            Notification::LevelTransition { .. } => EventKind::LevelTransition,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Handler = Box<dyn FnMut(&Notification)>;

struct Subscription {
    id: SubscriptionId,
    filter: Option<EventKind>,
    handler: Handler,
}

/// Publish/subscribe registry plus a pending log of everything published
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    pending: Vec<Notification>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every notification of `kind`, in publish order
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.register(Some(kind), Box::new(handler))
    }

    /// Call `handler` for every notification
    pub fn subscribe_all(&mut self, handler: impl FnMut(&Notification) + 'static) -> SubscriptionId {
        self.register(None, Box::new(handler))
    }

    fn register(&mut self, filter: Option<EventKind>, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            filter,
            handler,
        });
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn publish(&mut self, notification: Notification) {
        let kind = notification.kind();
        for subscription in &mut self.subscriptions {
            if subscription.filter.map_or(true, |f| f == kind) {
                (subscription.handler)(&notification);
            }
        }
        self.pending.push(notification);
    }

    /// Notifications published since the last drain
    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    /// Drop every subscription and the pending log (new session)
    pub fn reset(&mut self) {
        self.subscriptions.clear();
        self.pending.clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscription_filters_by_kind() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe(EventKind::DeliveryFailed, move |n| sink.borrow_mut().push(n.clone()));

        bus.publish(Notification::GamePaused);
        bus.publish(Notification::DeliveryFailed);

        assert_eq!(*seen.borrow(), vec![Notification::DeliveryFailed]);
        assert_eq!(bus.pending().len(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let counter = count.clone();
        let id = bus.subscribe_all(move |_| *counter.borrow_mut() += 1);
        bus.publish(Notification::GamePaused);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(Notification::GameUnpaused);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_drain_and_reset() {
        let mut bus = EventBus::new();
        bus.subscribe_all(|_| {});
        bus.publish(Notification::GamePaused);

        assert_eq!(bus.drain(), vec![Notification::GamePaused]);
        assert!(bus.pending().is_empty());

        bus.publish(Notification::GameUnpaused);
        bus.reset();
        assert!(bus.pending().is_empty());
        assert_eq!(bus.subscriber_count(), 0);
    }
}
