//! Kitchen Headless Play Harness
//!
//! Loads the shipped catalog and level, then plays scripted sessions against
//! the engine. No rendering, no input devices, no audio.
//!
//! Usage:
//!   cargo run -p kitchen-simtest
//!   cargo run -p kitchen-simtest -- --verbose
//!   RUST_LOG=debug cargo run -p kitchen-simtest

use kitchen_core::prelude::*;
use log::info;
use std::cell::Cell;
use std::rc::Rc;

// ── Shipped data ────────────────────────────────────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/kitchen_catalog.json");
const LEVEL_JSON: &str = include_str!("../../../data/level_1.json");

/// Frame length used when the harness lets time pass
const FRAME: f32 = 1.0 / 30.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Kitchen Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalog and level data
    results.extend(validate_data(verbose));

    // 2. A scripted chef plays a whole mission
    results.extend(validate_chef_session(verbose));

    // 3. An idle session runs out of time
    results.extend(validate_idle_session(verbose));

    // 4. Pause and restart
    results.extend(validate_pause_and_restart(verbose));

    // 5. Career persistence
    results.extend(validate_career_save(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

/// Aim at a station by name and press interact
fn press_station(kitchen: &mut Kitchen, name: &str) -> Result<(), String> {
    let station = kitchen
        .station_by_name(name)
        .ok_or_else(|| format!("no station named '{}'", name))?;
    kitchen.set_target(Some(station)).map_err(|e| e.to_string())?;
    kitchen.interact().map_err(|e| e.to_string())
}

fn load_kitchen(config: SessionConfig) -> Result<Kitchen, String> {
    let catalog = KitchenCatalog::from_json(CATALOG_JSON).map_err(|e| e.to_string())?;
    let layout = LevelLayout::from_json(LEVEL_JSON).map_err(|e| e.to_string())?;
    let mut kitchen = Kitchen::new(catalog, config);
    kitchen.build_layout(&layout).map_err(|e| e.to_string())?;
    kitchen.spawn_player(Position::new(0.0, 0.0));
    Ok(kitchen)
}

fn seeded() -> SessionConfig {
    SessionConfig {
        seed: Some(2024),
        ..Default::default()
    }
}

/// Let time pass until the mission is playing
fn run_until_playing(kitchen: &mut Kitchen) -> Result<(), String> {
    for _ in 0..1000 {
        if kitchen.mission.is_playing() {
            return Ok(());
        }
        kitchen.update(FRAME).map_err(|e| e.to_string())?;
    }
    Err(format!("still {:?} after countdown", kitchen.mission.state()))
}

// ── 1. Data ─────────────────────────────────────────────────────────────

fn validate_data(_verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog & Level ---");
    let mut results = Vec::new();

    let catalog = match KitchenCatalog::from_json(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(check("catalog_parse", false, format!("catalog error: {}", e)));
            return results;
        }
    };
    results.push(check(
        "catalog_parse",
        true,
        format!(
            "{} kinds, {} recipes",
            catalog.kinds().len(),
            catalog.recipes().len()
        ),
    ));

    let layout = match LevelLayout::from_json(LEVEL_JSON) {
        Ok(l) => l,
        Err(e) => {
            results.push(check("level_parse", false, format!("level error: {}", e)));
            return results;
        }
    };
    results.push(check(
        "level_parse",
        !layout.stations.is_empty(),
        format!("{} stations", layout.stations.len()),
    ));

    // Every recipe ingredient must be obtainable from some dispenser in the level
    let dispensed: Vec<KindId> = layout
        .stations
        .iter()
        .filter_map(|s| match s {
            StationSetup::Dispenser { kind, .. } => catalog.find(kind),
            _ => None,
        })
        .collect();
    let obtainable = |target: KindId| {
        dispensed.iter().any(|&raw| {
            raw == target
                || catalog.cutting_recipe(raw).map(|r| r.output) == Some(target)
                || catalog.frying_recipe(raw).map(|r| r.output) == Some(target)
        })
    };
    let unreachable: Vec<&str> = catalog
        .recipes()
        .iter()
        .filter(|r| !r.ingredients.iter().all(|&k| obtainable(k)))
        .map(|r| r.name.as_str())
        .collect();
    results.push(check(
        "recipes_reachable",
        unreachable.is_empty(),
        if unreachable.is_empty() {
            "every recipe can be cooked in level 1".into()
        } else {
            format!("cannot cook: {}", unreachable.join(", "))
        },
    ));

    let needs = [
        StationKind::Cutting,
        StationKind::Heating,
        StationKind::PlateSource,
        StationKind::Delivery,
    ];
    let missing: Vec<String> = needs
        .iter()
        .filter(|kind| !layout.stations.iter().any(|s| s.kind() == **kind))
        .map(|kind| format!("{:?}", kind))
        .collect();
    results.push(check(
        "level_has_workstations",
        missing.is_empty(),
        if missing.is_empty() {
            "cutting, heating, plates and delivery present".into()
        } else {
            format!("missing: {}", missing.join(", "))
        },
    ));

    results
}

// ── 2. Scripted chef ────────────────────────────────────────────────────

/// Looks up stations by role and works the kitchen like a player would
struct Chef {
    board: Entity,
    stove: Entity,
    counter: Entity,
    plates: Entity,
    delivery: Entity,
}

impl Chef {
    fn new(kitchen: &Kitchen) -> Result<Self, String> {
        let find = |name: &str| {
            kitchen
                .station_by_name(name)
                .ok_or_else(|| format!("level has no station named '{}'", name))
        };
        Ok(Self {
            board: find("cutting board")?,
            stove: find("stove")?,
            counter: find("counter")?,
            plates: find("plates")?,
            delivery: find("delivery")?,
        })
    }

    fn use_station(&self, kitchen: &mut Kitchen, station: Entity) -> Result<(), String> {
        kitchen.set_target(Some(station)).map_err(|e| e.to_string())?;
        kitchen.interact().map_err(|e| e.to_string())
    }

    fn dispenser_for(&self, kitchen: &Kitchen, kind: KindId) -> Option<Entity> {
        kitchen.stations().iter().copied().find(|&s| {
            kitchen
                .world
                .get::<&Dispenser>(s)
                .map_or(false, |d| d.kind == kind)
        })
    }

    fn wait(&self, kitchen: &mut Kitchen, seconds: f32) -> Result<(), String> {
        let frames = (seconds / FRAME).ceil() as u32;
        for _ in 0..frames {
            kitchen.update(FRAME).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    /// Bring one ingredient into the player's hands
    fn prepare(&self, kitchen: &mut Kitchen, target: KindId) -> Result<(), String> {
        let player = kitchen.player().map_err(|e| e.to_string())?;

        if let Some(dispenser) = self.dispenser_for(kitchen, target) {
            return self.use_station(kitchen, dispenser);
        }

        let cut_from = kitchen
            .catalog
            .kinds()
            .iter()
            .map(|k| k.id)
            .find(|&k| kitchen.catalog.cutting_recipe(k).map(|r| r.output) == Some(target));
        if let Some(raw) = cut_from {
            let dispenser = self.dispenser_for(kitchen, raw).ok_or("no dispenser for raw ingredient")?;
            self.use_station(kitchen, dispenser)?;
            self.use_station(kitchen, self.board)?;
            while kitchen.held_kind(self.board).map_err(|e| e.to_string())? != Some(target) {
                kitchen.interact_alternate().map_err(|e| e.to_string())?;
            }
            return self.use_station(kitchen, self.board);
        }

        let fried_from = kitchen
            .catalog
            .kinds()
            .iter()
            .map(|k| k.id)
            .find(|&k| kitchen.catalog.frying_recipe(k).map(|r| r.output) == Some(target));
        if let Some(raw) = fried_from {
            let dispenser = self.dispenser_for(kitchen, raw).ok_or("no dispenser for raw ingredient")?;
            self.use_station(kitchen, dispenser)?;
            self.use_station(kitchen, self.stove)?;
            for _ in 0..1000 {
                if kitchen.stove_phase(self.stove).map_err(|e| e.to_string())? == HeatingPhase::Fried {
                    break;
                }
                kitchen.update(FRAME).map_err(|e| e.to_string())?;
            }
            self.use_station(kitchen, self.stove)?;
            if kitchen.held_kind(player).map_err(|e| e.to_string())? != Some(target) {
                return Err("stove did not produce the fried ingredient".into());
            }
            return Ok(());
        }

        Err(format!("no way to make {}", kitchen.catalog.kind_name(target)))
    }

    /// Cook and deliver the first waiting order
    fn serve_next(&self, kitchen: &mut Kitchen) -> Result<String, String> {
        while kitchen.orders.waiting().is_empty() {
            if !kitchen.mission.is_playing() {
                return Err("mission ended while waiting for orders".into());
            }
            self.wait(kitchen, FRAME)?;
        }
        let order = *kitchen.orders.waiting().first().ok_or("no waiting orders")?;
        let recipe = kitchen
            .catalog
            .recipe(order.recipe)
            .ok_or("order for unknown recipe")?
            .clone();

        while kitchen.plates_available(self.plates).map_err(|e| e.to_string())? == 0 {
            self.wait(kitchen, FRAME)?;
        }
        self.use_station(kitchen, self.plates)?;
        self.use_station(kitchen, self.counter)?;

        for &ingredient in &recipe.ingredients {
            self.prepare(kitchen, ingredient)?;
            self.use_station(kitchen, self.counter)?;
        }

        self.use_station(kitchen, self.counter)?;
        self.use_station(kitchen, self.delivery)?;
        Ok(recipe.name)
    }
}

fn validate_chef_session(verbose: bool) -> Vec<TestResult> {
    println!("--- Chef Session ---");
    let mut results = Vec::new();

    let mut kitchen = match load_kitchen(seeded()) {
        Ok(k) => k,
        Err(e) => {
            results.push(check("chef_setup", false, e));
            return results;
        }
    };
    let chef = match Chef::new(&kitchen) {
        Ok(c) => c,
        Err(e) => {
            results.push(check("chef_setup", false, e));
            return results;
        }
    };

    let cuts = Rc::new(Cell::new(0u32));
    let counter = cuts.clone();
    kitchen
        .events
        .subscribe(EventKind::Cut, move |_| counter.set(counter.get() + 1));

    if let Err(e) = run_until_playing(&mut kitchen) {
        results.push(check("chef_countdown", false, e));
        return results;
    }

    let mut served = Vec::new();
    let mut error = None;
    while kitchen.mission.is_playing() {
        match chef.serve_next(&mut kitchen) {
            Ok(name) => {
                if verbose {
                    println!("    served {}", name);
                }
                served.push(name);
            }
            Err(e) => {
                error = Some(e);
                break;
            }
        }
        if let Err(e) = chef.wait(&mut kitchen, FRAME) {
            error = Some(e);
            break;
        }
    }
    info!("chef served {:?}", served);

    results.push(check(
        "chef_no_errors",
        error.is_none(),
        error.unwrap_or_else(|| "no protocol violations".into()),
    ));
    results.push(check(
        "chef_mission_success",
        kitchen.mission.state() == MissionState::Success,
        format!(
            "{:?} after {} deliveries ({} needed)",
            kitchen.mission.state(),
            kitchen.mission.delivered(),
            kitchen.mission.goal()
        ),
    ));
    results.push(check(
        "chef_goal_ends_early",
        kitchen.mission.playing_time_remaining() > 0.0,
        format!(
            "{:.1}s left on the clock",
            kitchen.mission.playing_time_remaining()
        ),
    ));
    results.push(check(
        "chef_career_advanced",
        kitchen.career.level == 2 && kitchen.career.missions_completed == 1,
        format!("career now at level {}", kitchen.career.level),
    ));
    let needed_knife = served.iter().any(|name| name != "Burger");
    results.push(check(
        "chef_cut_events_seen",
        cuts.get() > 0 || !needed_knife,
        format!("{} cuts heard by subscriber", cuts.get()),
    ));

    results
}

// ── 3. Idle session ─────────────────────────────────────────────────────

fn validate_idle_session(_verbose: bool) -> Vec<TestResult> {
    println!("--- Idle Session ---");
    let mut results = Vec::new();

    let mut kitchen = match load_kitchen(SessionConfig {
        playing_duration: 20.0,
        ..seeded()
    }) {
        Ok(k) => k,
        Err(e) => {
            results.push(check("idle_setup", false, e));
            return results;
        }
    };

    let mut states = vec![kitchen.mission.state()];
    for _ in 0..(30.0 / FRAME) as u32 {
        if let Err(e) = kitchen.update(FRAME) {
            results.push(check("idle_update", false, e.to_string()));
            return results;
        }
        if states.last() != Some(&kitchen.mission.state()) {
            states.push(kitchen.mission.state());
        }
    }

    let expected = vec![
        MissionState::WaitingToStart,
        MissionState::CountdownToStart,
        MissionState::Playing,
        MissionState::GameOver,
    ];
    results.push(check(
        "idle_state_sequence",
        states == expected,
        format!("{:?}", states),
    ));
    results.push(check(
        "idle_orders_capped",
        kitchen.orders.waiting().len() == kitchen.config().order_capacity,
        format!("{} orders waiting", kitchen.orders.waiting().len()),
    ));
    results.push(check(
        "idle_counts_failure",
        kitchen.career.missions_failed == 1 && kitchen.career.level == 1,
        format!("{} failed missions", kitchen.career.missions_failed),
    ));

    results
}

// ── 4. Pause & restart ──────────────────────────────────────────────────

fn validate_pause_and_restart(_verbose: bool) -> Vec<TestResult> {
    println!("--- Pause & Restart ---");
    let mut results = Vec::new();

    let mut kitchen = match load_kitchen(seeded()) {
        Ok(k) => k,
        Err(e) => {
            results.push(check("pause_setup", false, e));
            return results;
        }
    };
    if let Err(e) = run_until_playing(&mut kitchen) {
        results.push(check("pause_countdown", false, e));
        return results;
    }

    let before = kitchen.mission.playing_time_remaining();
    kitchen.toggle_pause();
    let paused_ticks: Result<(), String> =
        (0..100).try_for_each(|_| kitchen.update(FRAME).map_err(|e| e.to_string()));
    if let Err(e) = paused_ticks {
        results.push(check("pause_update", false, e));
    }
    results.push(check(
        "pause_freezes_clock",
        kitchen.mission.playing_time_remaining() == before,
        format!("{:.2}s remaining while paused", kitchen.mission.playing_time_remaining()),
    ));

    let items_before = kitchen.item_count();
    if let Err(e) = press_station(&mut kitchen, "bread crate") {
        results.push(check("pause_interact", false, e));
    }
    results.push(check(
        "pause_blocks_commands",
        kitchen.item_count() == items_before,
        "interaction ignored while paused".into(),
    ));
    kitchen.toggle_pause();

    if let Err(e) = press_station(&mut kitchen, "bread crate") {
        results.push(check("resume_interact", false, e));
    }
    let restarted = kitchen.restart_session();
    results.push(check(
        "restart_clears_items",
        restarted.is_ok() && kitchen.item_count() == 0,
        format!(
            "{} items, state {:?}",
            kitchen.item_count(),
            kitchen.mission.state()
        ),
    ));

    results
}

// ── 5. Career persistence ───────────────────────────────────────────────

fn validate_career_save(_verbose: bool) -> Vec<TestResult> {
    println!("--- Career Save ---");
    let mut results = Vec::new();

    let mut kitchen = match load_kitchen(seeded()) {
        Ok(k) => k,
        Err(e) => {
            results.push(check("career_setup", false, e));
            return results;
        }
    };
    kitchen.career.level = 7;
    kitchen.career.total_deliveries = 42;

    let mut buffer = Vec::new();
    let saved = kitchen.save_career(&mut buffer);
    results.push(check(
        "career_save",
        saved.is_ok(),
        format!("{} bytes", buffer.len()),
    ));

    let mut fresh = match load_kitchen(seeded()) {
        Ok(k) => k,
        Err(e) => {
            results.push(check("career_setup", false, e));
            return results;
        }
    };
    let loaded = fresh.load_career(&buffer[..]);
    results.push(check(
        "career_load",
        loaded.is_ok() && fresh.career == kitchen.career,
        format!("level {}, {} deliveries", fresh.career.level, fresh.career.total_deliveries),
    ));

    results
}
