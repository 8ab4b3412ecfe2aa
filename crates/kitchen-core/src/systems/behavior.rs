//! Station behaviour table
//!
//! Each [`StationKind`] maps to one static record of handlers. Dispatch is an
//! exhaustive match, so adding a variant without a record will not compile.

use super::interaction::StationContext;
use super::{counters, cutting, heating, plates};
use crate::components::StationKind;
use crate::error::KitchenError;
use hecs::Entity;

/// `(ctx, station, actor)`
pub type InteractFn = fn(&mut StationContext, Entity, Entity) -> Result<(), KitchenError>;
/// `(ctx, station, delta)`
pub type TickFn = fn(&mut StationContext, Entity, f32) -> Result<(), KitchenError>;

/// Handlers bound to one station variant
pub struct StationBehavior {
    pub interact: InteractFn,
    /// Secondary action, if the station has one
    pub interact_alternate: Option<InteractFn>,
    /// Per-tick update, if the station runs timers
    pub tick: Option<TickFn>,
}

static PLAIN: StationBehavior = StationBehavior {
    interact: counters::plain_interact,
    interact_alternate: None,
    tick: None,
};

static CUTTING: StationBehavior = StationBehavior {
    interact: cutting::interact,
    interact_alternate: Some(cutting::cut),
    tick: None,
};

static HEATING: StationBehavior = StationBehavior {
    interact: heating::interact,
    interact_alternate: None,
    tick: Some(heating::tick),
};

static DISPENSER: StationBehavior = StationBehavior {
    interact: counters::dispense,
    interact_alternate: None,
    tick: None,
};

static TRASH: StationBehavior = StationBehavior {
    interact: counters::trash,
    interact_alternate: None,
    tick: None,
};

static DELIVERY: StationBehavior = StationBehavior {
    interact: counters::deliver,
    interact_alternate: None,
    tick: None,
};

static PLATE_SOURCE: StationBehavior = StationBehavior {
    interact: plates::interact,
    interact_alternate: None,
    tick: Some(plates::tick),
};

pub fn behavior(kind: StationKind) -> &'static StationBehavior {
    match kind {
        StationKind::Plain => &PLAIN,
        StationKind::Cutting => &CUTTING,
        StationKind::Heating => &HEATING,
        StationKind::Dispenser => &DISPENSER,
        StationKind::Trash => &TRASH,
        StationKind::Delivery => &DELIVERY,
        StationKind::PlateSource => &PLATE_SOURCE,
    }
}
