//! Transfer protocol - the only code that changes which holder carries which item
//!
//! Items and holders are paired one-to-one. Moving, creating and destroying
//! items all go through here so the pairing cannot drift.

use crate::catalog::{KindId, KitchenCatalog};
use crate::components::{Anchor, Holder, KitchenItem, ObjectHolder, Plate, Player};
use crate::error::KitchenError;
use crate::events::{EventBus, Notification};
use hecs::{Entity, World};
use log::{debug, error};

/// Item currently carried by `holder`
pub fn held_item(world: &World, holder: Entity) -> Result<Option<Entity>, KitchenError> {
    let slot = world
        .get::<&Holder>(holder)
        .map_err(|_| KitchenError::NotAHolder(holder))?;
    Ok(slot.held_item())
}

pub fn kind_of(world: &World, item: Entity) -> Result<KindId, KitchenError> {
    Ok(world.get::<&KitchenItem>(item)?.kind)
}

pub fn is_plate(world: &World, item: Entity) -> bool {
    world.get::<&Plate>(item).is_ok()
}

/// Anchor the item should visually follow, `None` while unheld
pub fn follow_anchor(world: &World, item: Entity) -> Result<Option<Anchor>, KitchenError> {
    let holder = world.get::<&KitchenItem>(item)?.holder;
    match holder {
        Some(holder) => {
            let slot = world
                .get::<&Holder>(holder)
                .map_err(|_| KitchenError::NotAHolder(holder))?;
            Ok(Some(slot.follow_anchor()))
        }
        None => Ok(None),
    }
}

/// Move `item` onto `new_holder`, detaching it from its previous holder.
///
/// The destination must be empty. An occupied destination is refused before
/// anything is mutated.
pub fn transfer(
    world: &mut World,
    item: Entity,
    new_holder: Entity,
    bus: &mut EventBus,
) -> Result<(), KitchenError> {
    if let Some(existing) = held_item(world, new_holder)? {
        if existing == item {
            return Ok(());
        }
        error!(
            "refusing transfer of {:?}: holder {:?} already carries {:?}",
            item, new_holder, existing
        );
        return Err(KitchenError::HolderOccupied {
            holder: new_holder,
            existing,
        });
    }

    let previous = world.get::<&KitchenItem>(item)?.holder;
    if let Some(previous) = previous {
        world
            .get::<&mut Holder>(previous)
            .map_err(|_| KitchenError::NotAHolder(previous))?
            .clear_item();
    }

    world.get::<&mut KitchenItem>(item)?.holder = Some(new_holder);
    world.get::<&mut Holder>(new_holder)?.set_item(item);
    debug!("item {:?} moved {:?} -> {:?}", item, previous, new_holder);

    bus.publish(Notification::ObjectPlaced {
        holder: new_holder,
        item,
    });
    if world.get::<&Player>(new_holder).is_ok() {
        bus.publish(Notification::PickedUp {
            player: new_holder,
            item,
        });
    }
    Ok(())
}

/// Detach `item` from its holder and remove it from the world. Returns its kind.
pub fn destroy(world: &mut World, item: Entity) -> Result<KindId, KitchenError> {
    let (kind, holder) = {
        let state = world.get::<&KitchenItem>(item)?;
        (state.kind, state.holder)
    };
    let holder = holder.ok_or_else(|| {
        error!("destroying item {:?} that has no holder", item);
        KitchenError::ItemWithoutHolder(item)
    })?;

    world
        .get::<&mut Holder>(holder)
        .map_err(|_| KitchenError::NotAHolder(holder))?
        .clear_item();
    world.despawn(item)?;
    debug!("item {:?} destroyed (was on {:?})", item, holder);
    Ok(kind)
}

/// Create a new item of `kind` directly on `holder`, which must be empty
pub fn spawn_item(
    world: &mut World,
    catalog: &KitchenCatalog,
    kind: KindId,
    holder: Entity,
    bus: &mut EventBus,
) -> Result<Entity, KitchenError> {
    if let Some(existing) = held_item(world, holder)? {
        error!(
            "refusing to spawn {} onto {:?}: already carries {:?}",
            catalog.kind_name(kind),
            holder,
            existing
        );
        return Err(KitchenError::HolderOccupied { holder, existing });
    }

    let item = world.spawn((KitchenItem::new(kind),));
    if kind == catalog.plate_kind() {
        world.insert_one(item, Plate::new(catalog.plate_allowed().to_vec()))?;
    }
    debug!("spawned {} as {:?}", catalog.kind_name(kind), item);
    transfer(world, item, holder, bus)?;
    Ok(item)
}

#[cfg(test)]
pub(crate) fn pairing_is_consistent(world: &World) -> bool {
    let mut seen = std::collections::HashSet::new();
    for (holder, slot) in world.query::<&Holder>().iter() {
        if let Some(item) = slot.held_item() {
            if !seen.insert(item) {
                return false;
            }
            match world.get::<&KitchenItem>(item) {
                Ok(state) if state.holder == Some(holder) => {}
                _ => return false,
            }
        }
    }
    for (item, state) in world.query::<&KitchenItem>().iter() {
        let Some(holder) = state.holder else {
            return false;
        };
        match world.get::<&Holder>(holder) {
            Ok(slot) if slot.held_item() == Some(item) => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogDefinition;
    use crate::components::{Station, StationKind};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn catalog() -> KitchenCatalog {
        let definition = CatalogDefinition::default()
            .with_kind("Plate")
            .with_kind("Bread")
            .with_plate("Plate", &["Bread"]);
        KitchenCatalog::from_definition(definition).unwrap()
    }

    fn counter(world: &mut World) -> Entity {
        world.spawn((Station::new(StationKind::Plain, "counter"), Holder::counter_top()))
    }

    #[test]
    fn test_spawn_places_item_on_holder() {
        let catalog = catalog();
        let mut world = World::new();
        let mut bus = EventBus::new();
        let bread = catalog.find("Bread").unwrap();
        let station = counter(&mut world);

        let item = spawn_item(&mut world, &catalog, bread, station, &mut bus).unwrap();

        assert_eq!(held_item(&world, station).unwrap(), Some(item));
        assert_eq!(follow_anchor(&world, item).unwrap(), Some(Anchor::CounterTop));
        assert!(!is_plate(&world, item));
        assert_eq!(
            bus.pending(),
            &[Notification::ObjectPlaced {
                holder: station,
                item
            }]
        );
    }

    #[test]
    fn test_spawned_plate_gets_plate_role() {
        let catalog = catalog();
        let mut world = World::new();
        let mut bus = EventBus::new();
        let station = counter(&mut world);

        let plate = spawn_item(&mut world, &catalog, catalog.plate_kind(), station, &mut bus).unwrap();
        assert!(is_plate(&world, plate));
    }

    #[test]
    fn test_transfer_onto_occupied_holder_is_refused() {
        let catalog = catalog();
        let mut world = World::new();
        let mut bus = EventBus::new();
        let bread = catalog.find("Bread").unwrap();
        let a = counter(&mut world);
        let b = counter(&mut world);
        let first = spawn_item(&mut world, &catalog, bread, a, &mut bus).unwrap();
        let second = spawn_item(&mut world, &catalog, bread, b, &mut bus).unwrap();

        let err = transfer(&mut world, first, b, &mut bus).unwrap_err();
        assert!(matches!(err, KitchenError::HolderOccupied { .. }));

        // nothing moved
        assert_eq!(held_item(&world, a).unwrap(), Some(first));
        assert_eq!(held_item(&world, b).unwrap(), Some(second));
        assert!(pairing_is_consistent(&world));
    }

    #[test]
    fn test_spawn_onto_occupied_holder_is_refused() {
        let catalog = catalog();
        let mut world = World::new();
        let mut bus = EventBus::new();
        let bread = catalog.find("Bread").unwrap();
        let station = counter(&mut world);
        spawn_item(&mut world, &catalog, bread, station, &mut bus).unwrap();

        let items_before = world.query::<&KitchenItem>().iter().count();
        assert!(spawn_item(&mut world, &catalog, bread, station, &mut bus).is_err());
        assert_eq!(world.query::<&KitchenItem>().iter().count(), items_before);
    }

    #[test]
    fn test_destroy_without_holder_is_an_error() {
        let mut world = World::new();
        let orphan = world.spawn((KitchenItem::new(KindId(1)),));
        assert!(matches!(
            destroy(&mut world, orphan),
            Err(KitchenError::ItemWithoutHolder(_))
        ));
    }

    #[test]
    fn test_destroy_clears_holder() {
        let catalog = catalog();
        let mut world = World::new();
        let mut bus = EventBus::new();
        let bread = catalog.find("Bread").unwrap();
        let station = counter(&mut world);
        let item = spawn_item(&mut world, &catalog, bread, station, &mut bus).unwrap();

        assert_eq!(destroy(&mut world, item).unwrap(), bread);
        assert_eq!(held_item(&world, station).unwrap(), None);
        assert!(!world.contains(item));
    }

    #[test]
    fn test_random_operations_keep_pairing() {
        let catalog = catalog();
        let bread = catalog.find("Bread").unwrap();
        let mut world = World::new();
        let mut bus = EventBus::new();
        let mut rng = StdRng::seed_from_u64(7);
        let holders: Vec<Entity> = (0..5).map(|_| counter(&mut world)).collect();

        for _ in 0..500 {
            let holder = holders[rng.gen_range(0..holders.len())];
            match rng.gen_range(0..3) {
                0 => {
                    let _ = spawn_item(&mut world, &catalog, bread, holder, &mut bus);
                }
                1 => {
                    let items: Vec<Entity> =
                        world.query::<&KitchenItem>().iter().map(|(e, _)| e).collect();
                    if !items.is_empty() {
                        let item = items[rng.gen_range(0..items.len())];
                        let _ = transfer(&mut world, item, holder, &mut bus);
                    }
                }
                _ => {
                    if let Some(item) = held_item(&world, holder).unwrap() {
                        destroy(&mut world, item).unwrap();
                    }
                }
            }
            assert!(pairing_is_consistent(&world));
        }
    }
}
