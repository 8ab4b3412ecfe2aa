//! Plate source station - a regenerating stack of empty plates

use super::interaction::StationContext;
use super::transfer::{held_item, spawn_item};
use crate::components::PlateStack;
use crate::error::KitchenError;
use crate::events::Notification;
use hecs::Entity;

pub fn tick(ctx: &mut StationContext, station: Entity, delta: f32) -> Result<(), KitchenError> {
    let spawned = {
        let mut stack = ctx.world.get::<&mut PlateStack>(station)?;
        stack.spawn_timer += delta;
        if stack.spawn_timer > stack.spawn_period {
            stack.spawn_timer = 0.0;
            if stack.available < stack.capacity {
                stack.available += 1;
                true
            } else {
                false
            }
        } else {
            false
        }
    };
    if spawned {
        ctx.bus.publish(Notification::PlateSpawned { station });
    }
    Ok(())
}

/// Hand one plate to an empty-handed actor, if any are stacked
pub fn interact(ctx: &mut StationContext, station: Entity, actor: Entity) -> Result<(), KitchenError> {
    if held_item(ctx.world, actor)?.is_some() {
        return Ok(());
    }
    {
        let mut stack = ctx.world.get::<&mut PlateStack>(station)?;
        if stack.available == 0 {
            return Ok(());
        }
        stack.available -= 1;
    }
    spawn_item(ctx.world, ctx.catalog, ctx.catalog.plate_kind(), actor, ctx.bus)?;
    ctx.bus.publish(Notification::PlateRemoved { station });
    Ok(())
}
