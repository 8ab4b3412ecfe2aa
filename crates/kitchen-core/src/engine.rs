//! Kitchen engine - owns one session and runs it tick by tick

use crate::catalog::{CatalogError, KindId, KitchenCatalog};
use crate::components::*;
use crate::config::{LevelLayout, SessionConfig, StationSetup};
use crate::error::KitchenError;
use crate::events::{EventBus, Notification};
use crate::external::{SceneDirector, SpatialQuery};
use crate::persistence::{self, CareerRecord};
use crate::systems::transfer;
use crate::systems::*;
use hecs::{Entity, World};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Input for one tick, in the order it was received
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    /// Movement axes `[x, forward]`, each in -1..1
    Move([f32; 2]),
    Interact,
    InteractAlternate,
    TogglePause,
}

/// Main kitchen engine
pub struct Kitchen {
    /// ECS world containing stations, items and the player
    pub world: World,
    /// Read-only kinds, transformations and recipes
    pub catalog: KitchenCatalog,
    /// Notifications for audio, UI and visuals
    pub events: EventBus,
    /// Waiting orders
    pub orders: OrderBoard,
    /// Session state machine
    pub mission: MissionClock,
    /// Progress across missions
    pub career: CareerRecord,

    config: SessionConfig,
    rng: StdRng,
    time_scale: f32,
    player: Option<Entity>,
    /// Stations in creation order, which is also their tick order
    stations: Vec<Entity>,
    director: Option<Box<dyn SceneDirector>>,
}

impl Kitchen {
    /// Create an empty kitchen. Stations and the player are added afterwards.
    pub fn new(catalog: KitchenCatalog, config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world: World::new(),
            catalog,
            events: EventBus::new(),
            orders: OrderBoard::new(config.order_spawn_period, config.order_capacity),
            mission: MissionClock::from_config(&config),
            career: CareerRecord::default(),
            config,
            rng,
            time_scale: 1.0,
            player: None,
            stations: Vec::new(),
            director: None,
        }
    }

    /// Add a station. Dispensers must go through [`Kitchen::add_dispenser`].
    pub fn add_station(&mut self, kind: StationKind, name: &str) -> Result<Entity, KitchenError> {
        let station = match kind {
            StationKind::Dispenser => {
                return Err(KitchenError::DispenserWithoutKind(name.to_string()));
            }
            StationKind::Cutting => self.world.spawn((
                Station::new(kind, name),
                Holder::counter_top(),
                CuttingBoard::default(),
            )),
            StationKind::Heating => self.world.spawn((
                Station::new(kind, name),
                Holder::counter_top(),
                Stove::default(),
            )),
            StationKind::PlateSource => self.world.spawn((
                Station::new(kind, name),
                Holder::counter_top(),
                PlateStack::new(self.config.plate_capacity, self.config.plate_spawn_period),
            )),
            StationKind::Plain | StationKind::Trash | StationKind::Delivery => {
                self.world.spawn((Station::new(kind, name), Holder::counter_top()))
            }
        };
        self.stations.push(station);
        Ok(station)
    }

    pub fn add_dispenser(&mut self, name: &str, kind: KindId) -> Entity {
        let station = self.world.spawn((
            Station::new(StationKind::Dispenser, name),
            Holder::counter_top(),
            Dispenser { kind },
        ));
        self.stations.push(station);
        station
    }

    /// Build every station of a level, in file order
    pub fn build_layout(&mut self, layout: &LevelLayout) -> Result<Vec<Entity>, KitchenError> {
        let mut built = Vec::with_capacity(layout.stations.len());
        for setup in &layout.stations {
            let station = match setup {
                StationSetup::Dispenser { name, kind } => {
                    let id = self.catalog.find(kind).ok_or_else(|| CatalogError::UnknownKind {
                        name: kind.clone(),
                        context: format!("dispenser '{}'", name),
                    })?;
                    self.add_dispenser(name, id)
                }
                other => self.add_station(other.kind(), other.name())?,
            };
            built.push(station);
        }
        info!("built kitchen with {} stations", built.len());
        Ok(built)
    }

    /// Spawn the player. There is only ever one.
    pub fn spawn_player(&mut self, position: Position) -> Entity {
        if let Some(existing) = self.player {
            warn!("player already spawned as {:?}", existing);
            return existing;
        }
        let player = self.world.spawn((
            Player::new(self.config.player_speed, self.config.player_reach),
            Holder::hands(),
            position,
        ));
        self.player = Some(player);
        player
    }

    pub fn player(&self) -> Result<Entity, KitchenError> {
        self.player.ok_or(KitchenError::NoPlayer)
    }

    /// Advance timers only (no player input)
    pub fn update(&mut self, delta_seconds: f32) -> Result<(), KitchenError> {
        let scaled_delta = delta_seconds * self.effective_time_scale();
        if !self.mission.is_paused() {
            self.run_timers(scaled_delta)?;
        }
        self.settle_mission();
        Ok(())
    }

    /// One full tick: timers, then movement and targeting, then commands.
    ///
    /// The spatial query decides the player's target on every step.
    pub fn step(
        &mut self,
        delta_seconds: f32,
        commands: &[PlayerCommand],
        spatial: &dyn SpatialQuery,
    ) -> Result<(), KitchenError> {
        let scaled_delta = delta_seconds * self.effective_time_scale();
        if !self.mission.is_paused() {
            self.run_timers(scaled_delta)?;
        }

        if let Some(player) = self.player {
            let input = commands
                .iter()
                .rev()
                .find_map(|command| match command {
                    PlayerCommand::Move(axes) => Some(*axes),
                    _ => None,
                })
                .unwrap_or([0.0, 0.0]);
            move_player(&mut self.world, player, input, scaled_delta, spatial)?;
            update_target(&mut self.world, player, spatial, &mut self.events)?;
        }

        for command in commands {
            match command {
                PlayerCommand::Move(_) => {}
                PlayerCommand::Interact => self.interact()?,
                PlayerCommand::InteractAlternate => self.interact_alternate()?,
                PlayerCommand::TogglePause => {
                    self.toggle_pause();
                }
            }
        }

        self.settle_mission();
        Ok(())
    }

    fn run_timers(&mut self, delta: f32) -> Result<(), KitchenError> {
        self.mission.tick(delta, &mut self.events);
        self.orders
            .tick(delta, &self.catalog, &mut self.rng, &mut self.events);

        let stations = self.stations.clone();
        for station in stations {
            let kind = self.station_kind(station)?;
            if let Some(tick) = behavior(kind).tick {
                tick(&mut self.station_context(), station, delta)?;
            }
        }
        Ok(())
    }

    fn station_context(&mut self) -> StationContext<'_> {
        StationContext {
            world: &mut self.world,
            catalog: &self.catalog,
            bus: &mut self.events,
            orders: &mut self.orders,
            mission: &mut self.mission,
        }
    }

    fn accepts_commands(&self) -> bool {
        self.mission.is_playing() && !self.mission.is_paused()
    }

    fn selected_station(&self) -> Result<Option<(Entity, Entity)>, KitchenError> {
        let player = self.player()?;
        let target = self.world.get::<&Player>(player)?.target;
        Ok(target.map(|station| (station, player)))
    }

    /// Primary action on the selected station. Ignored unless playing.
    pub fn interact(&mut self) -> Result<(), KitchenError> {
        if !self.accepts_commands() {
            return Ok(());
        }
        let Some((station, player)) = self.selected_station()? else {
            return Ok(());
        };
        let handler = behavior(self.station_kind(station)?).interact;
        handler(&mut self.station_context(), station, player)
    }

    /// Secondary action (cut) on the selected station. Ignored unless playing.
    pub fn interact_alternate(&mut self) -> Result<(), KitchenError> {
        if !self.accepts_commands() {
            return Ok(());
        }
        let Some((station, player)) = self.selected_station()? else {
            return Ok(());
        };
        match behavior(self.station_kind(station)?).interact_alternate {
            Some(handler) => handler(&mut self.station_context(), station, player),
            None => Ok(()),
        }
    }

    /// Returns the new pause flag
    pub fn toggle_pause(&mut self) -> bool {
        self.mission.toggle_pause(&mut self.events)
    }

    /// Aim the player at a station directly, for hosts without spatial queries
    pub fn set_target(&mut self, station: Option<Entity>) -> Result<(), KitchenError> {
        if let Some(station) = station {
            self.station_kind(station)?;
        }
        let player = self.player()?;
        set_target(&mut self.world, player, station, &mut self.events)
    }

    /// Set simulation speed multiplier
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Zero while paused
    pub fn effective_time_scale(&self) -> f32 {
        if self.mission.is_paused() {
            0.0
        } else {
            self.time_scale
        }
    }

    pub fn set_scene_director(&mut self, director: Box<dyn SceneDirector>) {
        self.director = Some(director);
    }

    /// Forward the host's "back to menu" choice to the scene director
    pub fn return_to_menu(&mut self) {
        info!("returning to menu");
        if let Some(director) = self.director.as_mut() {
            director.return_to_menu();
        }
    }

    /// Collect a finished mission exactly once: career counters and level flow
    fn settle_mission(&mut self) {
        let Some(outcome) = self.mission.take_outcome() else {
            return;
        };
        self.career.total_deliveries += self.mission.delivered();

        if outcome == MissionState::Success {
            self.career.missions_completed += 1;
            self.career.level += 1;
            let next_level = self.career.level;
            info!("mission complete, advancing to level {}", next_level);
            self.events
                .publish(Notification::LevelTransition { next_level });
            if let Some(director) = self.director.as_mut() {
                director.advance_to_next_level(next_level);
            }
        } else {
            self.career.missions_failed += 1;
            info!(
                "mission failed with {}/{} deliveries",
                self.mission.delivered(),
                self.mission.goal()
            );
        }
    }

    /// Tear down every per-session registry and start over from `WaitingToStart`.
    ///
    /// Stations and the player stay. Items, orders, timers, event
    /// subscriptions and pending notifications are all dropped.
    pub fn restart_session(&mut self) -> Result<(), KitchenError> {
        // credit an outcome latched since the last tick before the clock resets
        self.settle_mission();

        let items: Vec<Entity> = self
            .world
            .query::<&KitchenItem>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for item in &items {
            self.world.despawn(*item)?;
        }

        for (_, holder) in self.world.query_mut::<&mut Holder>() {
            holder.clear_item();
        }
        for (_, board) in self.world.query_mut::<&mut CuttingBoard>() {
            board.reset();
        }
        for (_, stove) in self.world.query_mut::<&mut Stove>() {
            stove.reset();
        }
        for (_, stack) in self.world.query_mut::<&mut PlateStack>() {
            stack.reset();
        }
        for (_, player) in self.world.query_mut::<&mut Player>() {
            player.target = None;
            player.walking = false;
        }

        self.orders.reset();
        self.mission.reset();
        self.events.reset();
        info!("session restarted ({} items cleared)", items.len());
        Ok(())
    }

    /// Save the career record
    pub fn save_career<W: std::io::Write>(&self, writer: W) -> Result<(), KitchenError> {
        persistence::save_career(writer, &self.career)?;
        Ok(())
    }

    /// Replace the career record with a saved one
    pub fn load_career<R: std::io::Read>(&mut self, reader: R) -> Result<(), KitchenError> {
        self.career = persistence::load_career(reader)?;
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stations(&self) -> &[Entity] {
        &self.stations
    }

    pub fn station_by_name(&self, name: &str) -> Option<Entity> {
        self.stations.iter().copied().find(|station| {
            self.world
                .get::<&Station>(*station)
                .map_or(false, |s| s.name == name)
        })
    }

    pub fn station_kind(&self, station: Entity) -> Result<StationKind, KitchenError> {
        let state = self
            .world
            .get::<&Station>(station)
            .map_err(|_| KitchenError::NotAStation(station))?;
        Ok(state.kind)
    }

    pub fn held_item(&self, holder: Entity) -> Result<Option<Entity>, KitchenError> {
        transfer::held_item(&self.world, holder)
    }

    pub fn item_kind(&self, item: Entity) -> Result<KindId, KitchenError> {
        transfer::kind_of(&self.world, item)
    }

    /// Kind of whatever `holder` carries
    pub fn held_kind(&self, holder: Entity) -> Result<Option<KindId>, KitchenError> {
        match self.held_item(holder)? {
            Some(item) => Ok(Some(self.item_kind(item)?)),
            None => Ok(None),
        }
    }

    pub fn plate_contents(&self, plate: Entity) -> Result<Vec<KindId>, KitchenError> {
        Ok(self.world.get::<&Plate>(plate)?.contents().to_vec())
    }

    pub fn follow_anchor(&self, item: Entity) -> Result<Option<Anchor>, KitchenError> {
        transfer::follow_anchor(&self.world, item)
    }

    pub fn stove_phase(&self, station: Entity) -> Result<HeatingPhase, KitchenError> {
        Ok(self.world.get::<&Stove>(station)?.phase)
    }

    pub fn burn_warning(&self, station: Entity) -> Result<bool, KitchenError> {
        Ok(self.world.get::<&Stove>(station)?.burn_warning())
    }

    pub fn cutting_progress(&self, station: Entity) -> Result<f32, KitchenError> {
        Ok(self.world.get::<&CuttingBoard>(station)?.progress_normalized())
    }

    pub fn plates_available(&self, station: Entity) -> Result<u32, KitchenError> {
        Ok(self.world.get::<&PlateStack>(station)?.available)
    }

    pub fn item_count(&self) -> usize {
        self.world.query::<&KitchenItem>().iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogDefinition;
    use crate::external::OpenFloor;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn kitchen(config: SessionConfig) -> Kitchen {
        let definition = CatalogDefinition::default()
            .with_kind("Plate")
            .with_kind("Bread")
            .with_plate("Plate", &["Bread"])
            .with_recipe("Bread Plate", &["Bread"]);
        let catalog = KitchenCatalog::from_definition(definition).unwrap();
        Kitchen::new(
            catalog,
            SessionConfig {
                seed: Some(3),
                ..config
            },
        )
    }

    fn play(kitchen: &mut Kitchen) {
        kitchen.update(1.1).unwrap();
        kitchen.update(3.1).unwrap();
        assert!(kitchen.mission.is_playing());
    }

    #[derive(Default)]
    struct Recorder {
        levels: Vec<u32>,
        menus: u32,
    }

    struct SharedDirector(Rc<RefCell<Recorder>>);

    impl SceneDirector for SharedDirector {
        fn advance_to_next_level(&mut self, next_level: u32) {
            self.0.borrow_mut().levels.push(next_level);
        }

        fn return_to_menu(&mut self) {
            self.0.borrow_mut().menus += 1;
        }
    }

    #[test]
    fn test_dispenser_requires_kind() {
        let mut kitchen = kitchen(SessionConfig::default());
        assert!(matches!(
            kitchen.add_station(StationKind::Dispenser, "bread"),
            Err(KitchenError::DispenserWithoutKind(_))
        ));
    }

    #[test]
    fn test_commands_ignored_before_playing() {
        let mut kitchen = kitchen(SessionConfig::default());
        let bread = kitchen.catalog.find("Bread").unwrap();
        let dispenser = kitchen.add_dispenser("bread", bread);
        let player = kitchen.spawn_player(Position::new(0.0, 0.0));
        kitchen.set_target(Some(dispenser)).unwrap();

        kitchen.interact().unwrap();
        assert_eq!(kitchen.held_item(player).unwrap(), None);

        play(&mut kitchen);
        kitchen.interact().unwrap();
        assert_eq!(kitchen.held_kind(player).unwrap(), Some(bread));
    }

    #[test]
    fn test_pause_blocks_commands_and_timers() {
        let mut kitchen = kitchen(SessionConfig::default());
        let bread = kitchen.catalog.find("Bread").unwrap();
        let dispenser = kitchen.add_dispenser("bread", bread);
        let player = kitchen.spawn_player(Position::new(0.0, 0.0));
        kitchen.set_target(Some(dispenser)).unwrap();
        play(&mut kitchen);

        let remaining = kitchen.mission.playing_time_remaining();
        kitchen
            .step(0.0, &[PlayerCommand::TogglePause, PlayerCommand::Interact], &OpenFloor)
            .unwrap();
        assert!(kitchen.mission.is_paused());
        assert_eq!(kitchen.effective_time_scale(), 0.0);
        assert_eq!(kitchen.held_item(player).unwrap(), None);

        kitchen.update(50.0).unwrap();
        assert_eq!(kitchen.mission.playing_time_remaining(), remaining);
    }

    #[test]
    fn test_target_must_be_station() {
        let mut kitchen = kitchen(SessionConfig::default());
        let player = kitchen.spawn_player(Position::new(0.0, 0.0));
        assert!(matches!(
            kitchen.set_target(Some(player)),
            Err(KitchenError::NotAStation(_))
        ));
    }

    #[test]
    fn test_orders_spawn_during_update() {
        let mut kitchen = kitchen(SessionConfig::default());
        kitchen.update(0.1).unwrap();
        assert_eq!(kitchen.orders.waiting().len(), 1);
        for _ in 0..40 {
            kitchen.update(1.0).unwrap();
        }
        assert_eq!(kitchen.orders.waiting().len(), 4);
    }

    #[test]
    fn test_success_advances_level_once() {
        let mut kitchen = kitchen(SessionConfig {
            delivery_goal: 1,
            ..Default::default()
        });
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        kitchen.set_scene_director(Box::new(SharedDirector(recorder.clone())));
        play(&mut kitchen);

        kitchen.mission.record_delivery(&mut kitchen.events);
        kitchen.update(0.1).unwrap();
        kitchen.update(0.1).unwrap();

        assert_eq!(recorder.borrow().levels, vec![2]);
        assert_eq!(kitchen.career.level, 2);
        assert_eq!(kitchen.career.missions_completed, 1);
        assert_eq!(kitchen.career.total_deliveries, 1);

        kitchen.return_to_menu();
        assert_eq!(recorder.borrow().menus, 1);
    }

    #[test]
    fn test_timeout_counts_failure() {
        let mut kitchen = kitchen(SessionConfig {
            playing_duration: 5.0,
            ..Default::default()
        });
        play(&mut kitchen);
        kitchen.update(6.0).unwrap();

        assert_eq!(kitchen.mission.state(), MissionState::GameOver);
        assert_eq!(kitchen.career.missions_failed, 1);
        assert_eq!(kitchen.career.level, 1);
    }

    #[test]
    fn test_restart_clears_session() {
        let mut kitchen = kitchen(SessionConfig::default());
        let bread = kitchen.catalog.find("Bread").unwrap();
        let dispenser = kitchen.add_dispenser("bread", bread);
        let plates = kitchen.add_station(StationKind::PlateSource, "plates").unwrap();
        let player = kitchen.spawn_player(Position::new(0.0, 0.0));
        kitchen.set_target(Some(dispenser)).unwrap();
        play(&mut kitchen);
        kitchen.interact().unwrap();
        kitchen.events.subscribe_all(|_| {});

        kitchen.restart_session().unwrap();

        assert_eq!(kitchen.item_count(), 0);
        assert_eq!(kitchen.held_item(player).unwrap(), None);
        assert_eq!(kitchen.plates_available(plates).unwrap(), 0);
        assert!(kitchen.orders.waiting().is_empty());
        assert_eq!(kitchen.mission.state(), MissionState::WaitingToStart);
        assert_eq!(kitchen.events.subscriber_count(), 0);
        assert!(kitchen.events.pending().is_empty());
        assert_eq!(kitchen.stations().len(), 2);
    }

    #[test]
    fn test_restart_credits_unsettled_outcome() {
        let mut kitchen = kitchen(SessionConfig {
            delivery_goal: 1,
            ..Default::default()
        });
        play(&mut kitchen);
        kitchen.mission.record_delivery(&mut kitchen.events);
        assert_eq!(kitchen.mission.state(), MissionState::Success);

        kitchen.restart_session().unwrap();

        assert_eq!(kitchen.career.missions_completed, 1);
        assert_eq!(kitchen.career.level, 2);
        assert_eq!(kitchen.career.total_deliveries, 1);
        assert_eq!(kitchen.mission.state(), MissionState::WaitingToStart);
    }

    #[test]
    fn test_time_scale_speeds_up_stoves() {
        let definition = CatalogDefinition::default()
            .with_kind("Plate")
            .with_kind("PattyRaw")
            .with_kind("PattyCooked")
            .with_plate("Plate", &["PattyCooked"])
            .with_frying("PattyRaw", "PattyCooked", 4.0)
            .with_recipe("Patty", &["PattyCooked"]);
        let catalog = KitchenCatalog::from_definition(definition).unwrap();
        let raw = catalog.find("PattyRaw").unwrap();
        let mut kitchen = Kitchen::new(catalog, SessionConfig::default());
        let crate_station = kitchen.add_dispenser("patties", raw);
        let stove = kitchen.add_station(StationKind::Heating, "stove").unwrap();
        kitchen.spawn_player(Position::new(0.0, 0.0));
        play(&mut kitchen);

        kitchen.set_target(Some(crate_station)).unwrap();
        kitchen.interact().unwrap();
        kitchen.set_target(Some(stove)).unwrap();
        kitchen.interact().unwrap();

        kitchen.set_time_scale(2.0);
        assert_eq!(kitchen.time_scale(), 2.0);
        kitchen.update(1.0).unwrap();
        assert!((kitchen.world.get::<&Stove>(stove).unwrap().frying_timer - 2.0).abs() < 0.001);

        kitchen.update(1.5).unwrap();
        assert_eq!(kitchen.stove_phase(stove).unwrap(), HeatingPhase::Fried);

        kitchen.set_time_scale(-1.0);
        assert_eq!(kitchen.time_scale(), 0.0);
    }

    #[test]
    fn test_career_round_trip_through_engine() {
        let mut kitchen = kitchen(SessionConfig::default());
        kitchen.career.level = 5;
        let mut buffer = Vec::new();
        kitchen.save_career(&mut buffer).unwrap();

        kitchen.career = CareerRecord::default();
        kitchen.load_career(&buffer[..]).unwrap();
        assert_eq!(kitchen.career.level, 5);
    }
}
