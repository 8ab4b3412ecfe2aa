//! Simple counters: plain, dispenser, trash and delivery stations

use super::interaction::{hand_off, StationContext};
use super::orders::DeliveryOutcome;
use super::transfer::{destroy, held_item, spawn_item};
use crate::components::{Dispenser, Plate};
use crate::error::KitchenError;
use crate::events::Notification;
use hecs::Entity;
use log::debug;

/// Plain counter: the shared hand-off, accepting every kind
pub fn plain_interact(
    ctx: &mut StationContext,
    station: Entity,
    actor: Entity,
) -> Result<(), KitchenError> {
    hand_off(ctx, station, actor, |_, _| true)?;
    Ok(())
}

/// Hand a fresh item of the dispenser's kind to an empty-handed actor.
/// The dispenser itself never holds anything.
pub fn dispense(
    ctx: &mut StationContext,
    station: Entity,
    actor: Entity,
) -> Result<(), KitchenError> {
    if held_item(ctx.world, actor)?.is_some() {
        return Ok(());
    }
    let kind = ctx.world.get::<&Dispenser>(station)?.kind;
    spawn_item(ctx.world, ctx.catalog, kind, actor, ctx.bus)?;
    ctx.bus.publish(Notification::Dispensed { station, kind });
    Ok(())
}

pub fn trash(ctx: &mut StationContext, station: Entity, actor: Entity) -> Result<(), KitchenError> {
    let Some(item) = held_item(ctx.world, actor)? else {
        return Ok(());
    };
    let kind = destroy(ctx.world, item)?;
    debug!("trashed {}", ctx.catalog.kind_name(kind));
    ctx.bus.publish(Notification::ObjectTrashed { station });
    Ok(())
}

/// Submit the actor's plate to the order board. The plate is consumed
/// whether or not it matched.
pub fn deliver(
    ctx: &mut StationContext,
    _station: Entity,
    actor: Entity,
) -> Result<(), KitchenError> {
    let Some(item) = held_item(ctx.world, actor)? else {
        return Ok(());
    };
    let contents = match ctx.world.get::<&Plate>(item) {
        Ok(plate) => plate.contents().to_vec(),
        Err(_) => return Ok(()),
    };

    if let DeliveryOutcome::Succeeded { .. } = ctx.orders.deliver(&contents, ctx.catalog, ctx.bus) {
        ctx.mission.record_delivery(ctx.bus);
    }
    destroy(ctx.world, item)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Holder, Station, StationKind};
    use crate::events::EventKind;
    use crate::systems::interaction::tests::{sandwich_catalog, Fixture};

    fn station(f: &mut Fixture, kind: StationKind) -> Entity {
        f.world.spawn((Station::new(kind, "station"), Holder::counter_top()))
    }

    #[test]
    fn test_dispenser_spawns_into_empty_hands() {
        let mut f = Fixture::new(sandwich_catalog());
        let bread = f.kind("Bread");
        let dispenser = f.world.spawn((
            Station::new(StationKind::Dispenser, "bread"),
            Holder::counter_top(),
            Dispenser { kind: bread },
        ));
        let player = f.player;

        dispense(&mut f.ctx(), dispenser, player).unwrap();
        assert_eq!(f.held_kind(player), Some(bread));
        assert_eq!(f.held(dispenser), None);
        assert!(f
            .bus
            .pending()
            .contains(&Notification::Dispensed { station: dispenser, kind: bread }));

        // hands full: no second item
        let first = f.held(player);
        dispense(&mut f.ctx(), dispenser, player).unwrap();
        assert_eq!(f.held(player), first);
    }

    #[test]
    fn test_trash_destroys_held_item() {
        let mut f = Fixture::new(sandwich_catalog());
        let bin = station(&mut f, StationKind::Trash);
        let player = f.player;
        let bread = f.give(player, "Bread");

        trash(&mut f.ctx(), bin, player).unwrap();
        assert!(!f.world.contains(bread));
        assert_eq!(f.held(player), None);
        assert_eq!(f.held(bin), None);
        assert_eq!(f.bus.pending().last(), Some(&Notification::ObjectTrashed { station: bin }));

        f.bus.drain();
        trash(&mut f.ctx(), bin, player).unwrap();
        assert!(f.bus.pending().is_empty());
    }

    #[test]
    fn test_failed_delivery_still_consumes_plate() {
        let mut f = Fixture::new(sandwich_catalog());
        let counter = station(&mut f, StationKind::Delivery);
        let player = f.player;
        let plate = f.give(player, "Plate");
        f.bus.drain();

        deliver(&mut f.ctx(), counter, player).unwrap();
        assert!(!f.world.contains(plate));
        assert_eq!(f.held(player), None);
        let kinds: Vec<EventKind> = f.bus.pending().iter().map(Notification::kind).collect();
        assert_eq!(kinds, vec![EventKind::DeliveryFailed]);
    }

    #[test]
    fn test_delivery_ignores_bare_items() {
        let mut f = Fixture::new(sandwich_catalog());
        let counter = station(&mut f, StationKind::Delivery);
        let player = f.player;
        let bread = f.give(player, "Bread");

        deliver(&mut f.ctx(), counter, player).unwrap();
        assert_eq!(f.held(player), Some(bread));
    }
}
