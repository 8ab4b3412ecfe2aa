//! Session tuning and level layouts

use crate::components::StationKind;
use serde::{Deserialize, Serialize};

/// Timers, caps and player tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds before the countdown begins
    pub waiting_to_start: f32,
    pub countdown: f32,
    /// Length of the playing phase in seconds
    pub playing_duration: f32,
    /// Deliveries needed for success
    pub delivery_goal: u32,
    pub order_spawn_period: f32,
    pub order_capacity: usize,
    pub plate_spawn_period: f32,
    pub plate_capacity: u32,
    pub player_speed: f32,
    pub player_reach: f32,
    /// Fixed RNG seed for reproducible order sequences
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            waiting_to_start: 1.0,
            countdown: 3.0,
            playing_duration: 180.0,
            delivery_goal: 3,
            order_spawn_period: 4.0,
            order_capacity: 4,
            plate_spawn_period: 4.0,
            plate_capacity: 4,
            player_speed: 7.0,
            player_reach: 2.0,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One station to build, as written in a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StationSetup {
    Plain { name: String },
    Cutting { name: String },
    Heating { name: String },
    /// `kind` is a catalog kind name
    Dispenser { name: String, kind: String },
    Trash { name: String },
    Delivery { name: String },
    PlateSource { name: String },
}

impl StationSetup {
    pub fn kind(&self) -> StationKind {
        match self {
            StationSetup::Plain { .. } => StationKind::Plain,
            StationSetup::Cutting { .. } => StationKind::Cutting,
            StationSetup::Heating { .. } => StationKind::Heating,
            StationSetup::Dispenser { .. } => StationKind::Dispenser,
            StationSetup::Trash { .. } => StationKind::Trash,
            StationSetup::Delivery { .. } => StationKind::Delivery,
            StationSetup::PlateSource { .. } => StationKind::PlateSource,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StationSetup::Plain { name }
            | StationSetup::Cutting { name }
            | StationSetup::Heating { name }
            | StationSetup::Dispenser { name, .. }
            | StationSetup::Trash { name }
            | StationSetup::Delivery { name }
            | StationSetup::PlateSource { name } => name,
        }
    }
}

/// The stations that make up a kitchen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub stations: Vec<StationSetup>,
}

impl LevelLayout {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = SessionConfig::from_json(r#"{ "delivery_goal": 5, "seed": 42 }"#).unwrap();
        assert_eq!(config.delivery_goal, 5);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.playing_duration, 180.0);
        assert_eq!(config.order_capacity, 4);
    }

    #[test]
    fn test_layout_parses_tagged_stations() {
        let layout = LevelLayout::from_json(
            r#"{ "stations": [
                { "type": "Dispenser", "name": "tomatoes", "kind": "Tomato" },
                { "type": "Cutting", "name": "board" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(layout.stations.len(), 2);
        assert_eq!(layout.stations[0].kind(), StationKind::Dispenser);
        assert_eq!(layout.stations[1].name(), "board");
    }
}
