//! Station components: the fixed counters of the kitchen and their per-variant state.

use crate::catalog::{BurningRecipe, CuttingRecipe, FryingRecipe, KindId};
use serde::{Deserialize, Serialize};

/// Closed set of station variants. Behaviour is looked up per variant in
/// [`crate::systems::behavior`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationKind {
    /// Pass-through counter, holds anything
    Plain,
    Cutting,
    Heating,
    /// Infinite supply of one kind
    Dispenser,
    Trash,
    Delivery,
    /// Hands out empty plates from a regenerating stack
    PlateSource,
}

/// Station component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub kind: StationKind,
    pub name: String,
}

impl Station {
    pub fn new(kind: StationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Cutting progress of a cutting station
#[derive(Debug, Clone, Default)]
pub struct CuttingBoard {
    pub progress: u32,
    pub active: Option<CuttingRecipe>,
}

impl CuttingBoard {
    pub fn progress_normalized(&self) -> f32 {
        match self.active {
            Some(recipe) => self.progress as f32 / recipe.steps as f32,
            None => 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.progress = 0;
        self.active = None;
    }
}

/// Phases of a heating station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeatingPhase {
    #[default]
    Idle,
    Frying,
    Fried,
    /// Terminal until the item is taken away
    Burned,
}

/// Burn progress at which the warning (flashing bar, beeps) starts
pub const BURN_WARNING_THRESHOLD: f32 = 0.5;

/// Timers of a heating station
#[derive(Debug, Clone, Default)]
pub struct Stove {
    pub phase: HeatingPhase,
    pub frying_timer: f32,
    pub frying: Option<FryingRecipe>,
    pub burning_timer: f32,
    pub burning: Option<BurningRecipe>,
}

impl Stove {
    pub fn progress_normalized(&self) -> f32 {
        match (self.phase, self.frying, self.burning) {
            (HeatingPhase::Frying, Some(recipe), _) => self.frying_timer / recipe.duration,
            (HeatingPhase::Fried, _, Some(recipe)) => self.burning_timer / recipe.duration,
            _ => 0.0,
        }
    }

    /// True while a fried item is at risk of burning soon
    pub fn burn_warning(&self) -> bool {
        self.phase == HeatingPhase::Fried && self.progress_normalized() >= BURN_WARNING_THRESHOLD
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Kind handed out by a dispenser station
#[derive(Debug, Clone, Copy)]
pub struct Dispenser {
    pub kind: KindId,
}

/// Plate tokens waiting on a plate source
#[derive(Debug, Clone)]
pub struct PlateStack {
    pub available: u32,
    pub capacity: u32,
    pub spawn_timer: f32,
    pub spawn_period: f32,
}

impl PlateStack {
    pub fn new(capacity: u32, spawn_period: f32) -> Self {
        Self {
            available: 0,
            capacity,
            spawn_timer: 0.0,
            spawn_period,
        }
    }

    pub fn reset(&mut self) {
        self.available = 0;
        self.spawn_timer = 0.0;
    }
}
