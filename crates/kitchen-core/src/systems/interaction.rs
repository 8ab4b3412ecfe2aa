//! Interaction system - the shared hand-off rule between the player and a station
//!
//! Every station that lets the player put things down or pick things up runs
//! [`hand_off`] first and reacts to the [`HandOff`] it reports.

use crate::catalog::{KindId, KitchenCatalog};
use crate::components::Plate;
use crate::error::KitchenError;
use crate::events::{EventBus, Notification};
use crate::systems::mission::MissionClock;
use crate::systems::orders::OrderBoard;
use crate::systems::transfer::{destroy, held_item, is_plate, kind_of, transfer};
use hecs::{Entity, World};

/// Everything a station handler may touch during one interaction or tick
pub struct StationContext<'a> {
    pub world: &'a mut World,
    pub catalog: &'a KitchenCatalog,
    pub bus: &'a mut EventBus,
    pub orders: &'a mut OrderBoard,
    pub mission: &'a mut MissionClock,
}

/// What a hand-off ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOff {
    Nothing,
    /// The player's item went onto the station
    Placed,
    /// The station's item went into the player's hands
    PickedUp,
    /// The station's item was added to the plate the player carries
    PlatedFromStation,
    /// The player's item was added to the plate on the station
    PlatedFromActor,
}

impl HandOff {
    /// True when the station lost its item
    pub fn emptied_station(self) -> bool {
        matches!(self, HandOff::PickedUp | HandOff::PlatedFromStation)
    }
}

/// Add `kind` to a plate. Returns false (and changes nothing) if the plate refuses it.
pub fn try_add_ingredient(
    world: &World,
    plate: Entity,
    kind: KindId,
    bus: &mut EventBus,
) -> Result<bool, KitchenError> {
    let added = world.get::<&mut Plate>(plate)?.try_add(kind);
    if added {
        bus.publish(Notification::IngredientAdded { plate, kind });
    }
    Ok(added)
}

/// Primary action hand-off between `actor` and `station`.
///
/// | station | actor | result |
/// |---------|-------|--------|
/// | empty   | empty | nothing |
/// | empty   | item  | item placed, if `accepts` its kind |
/// | item    | empty | item picked up |
/// | item    | plate | station item plated, if the plate takes it |
/// | plate   | item  | actor item plated, if the plate takes it |
/// | item    | item  | nothing |
pub fn hand_off(
    ctx: &mut StationContext,
    station: Entity,
    actor: Entity,
    accepts: impl Fn(&KitchenCatalog, KindId) -> bool,
) -> Result<HandOff, KitchenError> {
    let on_station = held_item(ctx.world, station)?;
    let in_hands = held_item(ctx.world, actor)?;

    match (on_station, in_hands) {
        (None, None) => Ok(HandOff::Nothing),
        (None, Some(item)) => {
            let kind = kind_of(ctx.world, item)?;
            if !accepts(ctx.catalog, kind) {
                return Ok(HandOff::Nothing);
            }
            transfer(ctx.world, item, station, ctx.bus)?;
            Ok(HandOff::Placed)
        }
        (Some(item), None) => {
            transfer(ctx.world, item, actor, ctx.bus)?;
            Ok(HandOff::PickedUp)
        }
        (Some(station_item), Some(actor_item)) => {
            if is_plate(ctx.world, actor_item) {
                let kind = kind_of(ctx.world, station_item)?;
                if try_add_ingredient(ctx.world, actor_item, kind, ctx.bus)? {
                    destroy(ctx.world, station_item)?;
                    return Ok(HandOff::PlatedFromStation);
                }
            } else if is_plate(ctx.world, station_item) {
                let kind = kind_of(ctx.world, actor_item)?;
                if try_add_ingredient(ctx.world, station_item, kind, ctx.bus)? {
                    destroy(ctx.world, actor_item)?;
                    return Ok(HandOff::PlatedFromActor);
                }
            }
            Ok(HandOff::Nothing)
        }
    }
}
