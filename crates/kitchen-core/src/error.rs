//! Error types for the simulation core

use crate::catalog::CatalogError;
use crate::persistence::SaveError;
use hecs::Entity;
use thiserror::Error;

/// Errors surfaced by kitchen operations.
///
/// Apart from `Catalog` and `Save`, every variant means a caller broke the
/// transfer protocol's preconditions. They are programming errors, not
/// gameplay outcomes: gameplay mismatches are silent no-ops.
#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("holder {holder:?} already carries {existing:?}")]
    HolderOccupied { holder: Entity, existing: Entity },

    #[error("item {0:?} has no holder")]
    ItemWithoutHolder(Entity),

    #[error("entity {0:?} cannot hold items")]
    NotAHolder(Entity),

    #[error("entity {0:?} is not a station")]
    NotAStation(Entity),

    #[error("no player has been spawned")]
    NoPlayer,

    #[error("dispenser '{0}' needs a kind to hand out")]
    DispenserWithoutKind(String),

    #[error(transparent)]
    NoSuchEntity(#[from] hecs::NoSuchEntity),

    #[error(transparent)]
    Component(#[from] hecs::ComponentError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Save(#[from] SaveError),
}
