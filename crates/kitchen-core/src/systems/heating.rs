//! Heating station - frying then burning, on timers
//!
//! A tick crosses at most one phase boundary. Time left over past a boundary
//! is dropped, so a fried item is always observable before it burns.

use super::interaction::{hand_off, HandOff, StationContext};
use super::transfer::{destroy, held_item, kind_of, spawn_item};
use crate::catalog::{KindId, KitchenCatalog};
use crate::components::{HeatingPhase, Stove};
use crate::error::KitchenError;
use crate::events::Notification;
use hecs::Entity;
use log::debug;

fn fryable(catalog: &KitchenCatalog, kind: KindId) -> bool {
    catalog.frying_recipe(kind).is_some()
}

fn publish_phase(ctx: &mut StationContext, station: Entity, phase: HeatingPhase) {
    ctx.bus.publish(Notification::HeatingStateChanged { station, phase });
}

fn publish_progress(ctx: &mut StationContext, station: Entity, progress: f32) {
    ctx.bus.publish(Notification::ProgressChanged {
        emitter: station,
        progress: progress.min(1.0),
    });
}

pub fn interact(ctx: &mut StationContext, station: Entity, actor: Entity) -> Result<(), KitchenError> {
    let outcome = hand_off(ctx, station, actor, fryable)?;
    if outcome == HandOff::Placed {
        let Some(item) = held_item(ctx.world, station)? else {
            return Ok(());
        };
        let recipe = ctx.catalog.frying_recipe(kind_of(ctx.world, item)?);
        {
            let mut stove = ctx.world.get::<&mut Stove>(station)?;
            stove.reset();
            stove.phase = HeatingPhase::Frying;
            stove.frying = recipe;
        }
        publish_phase(ctx, station, HeatingPhase::Frying);
        publish_progress(ctx, station, 0.0);
    } else if outcome.emptied_station() {
        ctx.world.get::<&mut Stove>(station)?.reset();
        publish_phase(ctx, station, HeatingPhase::Idle);
        publish_progress(ctx, station, 0.0);
    }
    Ok(())
}

pub fn tick(ctx: &mut StationContext, station: Entity, delta: f32) -> Result<(), KitchenError> {
    let Some(item) = held_item(ctx.world, station)? else {
        return Ok(());
    };
    let stove: Stove = (*ctx.world.get::<&Stove>(station)?).clone();

    match stove.phase {
        HeatingPhase::Idle | HeatingPhase::Burned => {}
        HeatingPhase::Frying => {
            let Some(recipe) = stove.frying else {
                return Ok(());
            };
            let timer = stove.frying_timer + delta;
            ctx.world.get::<&mut Stove>(station)?.frying_timer = timer;
            publish_progress(ctx, station, timer / recipe.duration);

            if timer > recipe.duration {
                destroy(ctx.world, item)?;
                spawn_item(ctx.world, ctx.catalog, recipe.output, station, ctx.bus)?;
                let burning = ctx.catalog.burning_recipe(recipe.output);
                if burning.is_none() {
                    debug!("{} cannot burn, stove stays fried", ctx.catalog.kind_name(recipe.output));
                }
                {
                    let mut stove = ctx.world.get::<&mut Stove>(station)?;
                    stove.phase = HeatingPhase::Fried;
                    stove.burning = burning;
                    stove.burning_timer = 0.0;
                }
                publish_phase(ctx, station, HeatingPhase::Fried);
            }
        }
        HeatingPhase::Fried => {
            let Some(recipe) = stove.burning else {
                return Ok(());
            };
            let timer = stove.burning_timer + delta;
            ctx.world.get::<&mut Stove>(station)?.burning_timer = timer;
            publish_progress(ctx, station, timer / recipe.duration);

            if timer > recipe.duration {
                destroy(ctx.world, item)?;
                spawn_item(ctx.world, ctx.catalog, recipe.output, station, ctx.bus)?;
                ctx.world.get::<&mut Stove>(station)?.phase = HeatingPhase::Burned;
                publish_phase(ctx, station, HeatingPhase::Burned);
                publish_progress(ctx, station, 0.0);
            }
        }
    }
    Ok(())
}
