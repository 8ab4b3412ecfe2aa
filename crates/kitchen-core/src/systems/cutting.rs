//! Cutting station - discrete-step transformation driven by the secondary action

use super::interaction::{hand_off, HandOff, StationContext};
use super::transfer::{destroy, held_item, kind_of, spawn_item};
use crate::catalog::{KindId, KitchenCatalog};
use crate::components::CuttingBoard;
use crate::error::KitchenError;
use crate::events::Notification;
use hecs::Entity;
use log::debug;

fn cuttable(catalog: &KitchenCatalog, kind: KindId) -> bool {
    catalog.cutting_recipe(kind).is_some()
}

pub fn interact(ctx: &mut StationContext, station: Entity, actor: Entity) -> Result<(), KitchenError> {
    let outcome = hand_off(ctx, station, actor, cuttable)?;
    if outcome == HandOff::Placed {
        let Some(item) = held_item(ctx.world, station)? else {
            return Ok(());
        };
        let recipe = ctx.catalog.cutting_recipe(kind_of(ctx.world, item)?);
        {
            let mut board = ctx.world.get::<&mut CuttingBoard>(station)?;
            board.progress = 0;
            board.active = recipe;
        }
        ctx.bus.publish(Notification::ProgressChanged {
            emitter: station,
            progress: 0.0,
        });
    } else if outcome.emptied_station() {
        ctx.world.get::<&mut CuttingBoard>(station)?.reset();
    }
    Ok(())
}

/// One cut. Does nothing unless the station holds something with a cutting recipe.
pub fn cut(ctx: &mut StationContext, station: Entity, _actor: Entity) -> Result<(), KitchenError> {
    let Some(item) = held_item(ctx.world, station)? else {
        return Ok(());
    };
    let Some(recipe) = ctx.catalog.cutting_recipe(kind_of(ctx.world, item)?) else {
        return Ok(());
    };

    let progress = {
        let mut board = ctx.world.get::<&mut CuttingBoard>(station)?;
        board.active = Some(recipe);
        board.progress += 1;
        board.progress
    };
    ctx.bus.publish(Notification::Cut { station });
    ctx.bus.publish(Notification::ProgressChanged {
        emitter: station,
        progress: progress as f32 / recipe.steps as f32,
    });

    if progress >= recipe.steps {
        destroy(ctx.world, item)?;
        spawn_item(ctx.world, ctx.catalog, recipe.output, station, ctx.bus)?;
        ctx.world.get::<&mut CuttingBoard>(station)?.reset();
        debug!(
            "{} cut into {}",
            ctx.catalog.kind_name(recipe.input),
            ctx.catalog.kind_name(recipe.output)
        );
        ctx.bus.publish(Notification::ProgressChanged {
            emitter: station,
            progress: 0.0,
        });
    }
    Ok(())
}
