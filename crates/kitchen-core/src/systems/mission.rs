//! Mission clock - countdown, playing timer and delivery goal for one session

use crate::config::SessionConfig;
use crate::events::{EventBus, Notification};
use log::info;
use serde::{Deserialize, Serialize};

/// Phase of a mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionState {
    WaitingToStart,
    CountdownToStart,
    /// Player commands are only routed in this state
    Playing,
    GameOver,
    Success,
}

impl MissionState {
    pub fn is_finished(&self) -> bool {
        matches!(self, MissionState::GameOver | MissionState::Success)
    }
}

/// Session state machine plus the orthogonal pause flag
#[derive(Debug, Clone)]
pub struct MissionClock {
    state: MissionState,
    waiting_timer: f32,
    countdown_timer: f32,
    playing_timer: f32,
    waiting_duration: f32,
    countdown_duration: f32,
    playing_duration: f32,
    goal: u32,
    delivered: u32,
    paused: bool,
    /// Finished state not yet collected by the engine
    outcome: Option<MissionState>,
}

impl Default for MissionClock {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl MissionClock {
    pub fn new(waiting: f32, countdown: f32, playing: f32, goal: u32) -> Self {
        Self {
            state: MissionState::WaitingToStart,
            waiting_timer: waiting,
            countdown_timer: countdown,
            playing_timer: playing,
            waiting_duration: waiting,
            countdown_duration: countdown,
            playing_duration: playing,
            goal,
            delivered: 0,
            paused: false,
            outcome: None,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            config.waiting_to_start,
            config.countdown,
            config.playing_duration,
            config.delivery_goal,
        )
    }

    pub fn tick(&mut self, delta: f32, bus: &mut EventBus) {
        if self.paused {
            return;
        }
        match self.state {
            MissionState::WaitingToStart => {
                self.waiting_timer -= delta;
                if self.waiting_timer < 0.0 {
                    self.set_state(MissionState::CountdownToStart, bus);
                }
            }
            MissionState::CountdownToStart => {
                self.countdown_timer -= delta;
                if self.countdown_timer < 0.0 {
                    self.playing_timer = self.playing_duration;
                    self.set_state(MissionState::Playing, bus);
                }
            }
            MissionState::Playing => {
                self.playing_timer -= delta;
                if self.playing_timer < 0.0 {
                    self.evaluate(bus);
                }
            }
            MissionState::GameOver | MissionState::Success => {}
        }
    }

    /// Count one successful delivery. Reaching the goal while playing ends the mission at once.
    pub fn record_delivery(&mut self, bus: &mut EventBus) {
        self.delivered += 1;
        bus.publish(Notification::RecipeSuccess {
            delivered: self.delivered,
            goal: self.goal,
        });
        if self.state == MissionState::Playing && self.delivered >= self.goal {
            self.evaluate(bus);
        }
    }

    fn evaluate(&mut self, bus: &mut EventBus) {
        let next = if self.delivered >= self.goal {
            MissionState::Success
        } else {
            MissionState::GameOver
        };
        self.set_state(next, bus);
    }

    fn set_state(&mut self, state: MissionState, bus: &mut EventBus) {
        info!("mission {:?} -> {:?}", self.state, state);
        self.state = state;
        if state.is_finished() {
            self.outcome = Some(state);
        }
        bus.publish(Notification::MissionStateChanged { state });
    }

    /// Flip the pause flag. Returns the new value.
    pub fn toggle_pause(&mut self, bus: &mut EventBus) -> bool {
        self.paused = !self.paused;
        if self.paused {
            info!("game paused");
            bus.publish(Notification::GamePaused);
        } else {
            info!("game unpaused");
            bus.publish(Notification::GameUnpaused);
        }
        self.paused
    }

    /// Finished state, returned once
    pub fn take_outcome(&mut self) -> Option<MissionState> {
        self.outcome.take()
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_playing(&self) -> bool {
        self.state == MissionState::Playing
    }

    pub fn delivered(&self) -> u32 {
        self.delivered
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn countdown_remaining(&self) -> f32 {
        self.countdown_timer.max(0.0)
    }

    /// Whole seconds shown on the countdown (3, 2, 1)
    pub fn countdown_number(&self) -> u32 {
        self.countdown_remaining().ceil() as u32
    }

    pub fn playing_time_remaining(&self) -> f32 {
        self.playing_timer.max(0.0)
    }

    /// Elapsed fraction of the playing time, 0 at start and 1 at the end
    pub fn playing_progress(&self) -> f32 {
        if self.playing_duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.playing_time_remaining() / self.playing_duration).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        *self = Self::new(
            self.waiting_duration,
            self.countdown_duration,
            self.playing_duration,
            self.goal,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(bus: &EventBus) -> Vec<MissionState> {
        bus.pending()
            .iter()
            .filter_map(|n| match n {
                Notification::MissionStateChanged { state } => Some(*state),
                _ => None,
            })
            .collect()
    }

    fn start_playing(clock: &mut MissionClock, bus: &mut EventBus) {
        clock.tick(1.1, bus);
        clock.tick(3.1, bus);
        assert!(clock.is_playing());
    }

    #[test]
    fn test_runs_through_to_game_over() {
        let mut clock = MissionClock::new(1.0, 3.0, 10.0, 3);
        let mut bus = EventBus::new();

        clock.tick(0.5, &mut bus);
        assert_eq!(clock.state(), MissionState::WaitingToStart);
        start_playing(&mut clock, &mut bus);
        assert_eq!(clock.playing_time_remaining(), 10.0);

        clock.tick(10.5, &mut bus);
        assert_eq!(clock.state(), MissionState::GameOver);
        assert_eq!(
            states(&bus),
            vec![
                MissionState::CountdownToStart,
                MissionState::Playing,
                MissionState::GameOver
            ]
        );
        assert_eq!(clock.take_outcome(), Some(MissionState::GameOver));
        assert_eq!(clock.take_outcome(), None);
    }

    #[test]
    fn test_goal_reached_mid_game_is_success() {
        let mut clock = MissionClock::new(1.0, 3.0, 180.0, 3);
        let mut bus = EventBus::new();
        start_playing(&mut clock, &mut bus);

        clock.record_delivery(&mut bus);
        clock.record_delivery(&mut bus);
        assert!(clock.is_playing());
        clock.record_delivery(&mut bus);
        assert_eq!(clock.state(), MissionState::Success);

        // timer expiry later does not overturn it
        clock.tick(500.0, &mut bus);
        assert_eq!(clock.state(), MissionState::Success);
    }

    #[test]
    fn test_pause_freezes_timers() {
        let mut clock = MissionClock::new(1.0, 3.0, 180.0, 3);
        let mut bus = EventBus::new();

        assert!(clock.toggle_pause(&mut bus));
        clock.tick(100.0, &mut bus);
        assert_eq!(clock.state(), MissionState::WaitingToStart);

        assert!(!clock.toggle_pause(&mut bus));
        assert_eq!(
            bus.pending(),
            &[Notification::GamePaused, Notification::GameUnpaused]
        );
    }

    #[test]
    fn test_countdown_queries() {
        let mut clock = MissionClock::new(1.0, 3.0, 100.0, 3);
        let mut bus = EventBus::new();
        clock.tick(1.1, &mut bus);
        clock.tick(0.5, &mut bus);
        assert_eq!(clock.countdown_number(), 3);
        clock.tick(1.0, &mut bus);
        assert_eq!(clock.countdown_number(), 2);

        clock.tick(2.0, &mut bus);
        clock.tick(25.0, &mut bus);
        assert!((clock.playing_progress() - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_reset_restores_waiting() {
        let mut clock = MissionClock::new(1.0, 3.0, 10.0, 1);
        let mut bus = EventBus::new();
        start_playing(&mut clock, &mut bus);
        clock.record_delivery(&mut bus);

        clock.reset();
        assert_eq!(clock.state(), MissionState::WaitingToStart);
        assert_eq!(clock.delivered(), 0);
        assert_eq!(clock.goal(), 1);
        assert_eq!(clock.take_outcome(), None);
    }
}
