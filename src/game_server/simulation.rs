//! Simulation - Per-session game server
//!
//! Bundles the fuzzy controller, the race and the clock into the context
//! object a transport owns for one player. Ticks must be applied in order;
//! separate sessions share nothing.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::fuzzy::{Activations, ControlCommand, FuzzyController, PerceptionFrame};
use crate::game_server::clock::SimulationClock;
use crate::game_server::race::{Race, RaceConfig, RaceSnapshot, RaceStatus};
use crate::game_server::random::RandomSource;

/// Number of recent ticks averaged for the timing statistic
const TICK_WINDOW: usize = 60;

/// Session statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStats {
    pub ticks: u64,
    pub avg_tick_time_ms: f32,
    pub traffic_count: u32,
    pub best_score: u64,
    pub status: RaceStatus,
}

/// Everything produced by one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub angle: f64,
    pub hands: i32,
    pub gesture: i32,
    pub control: ControlCommand,
    pub fuzzy: Activations,
    pub game: RaceSnapshot,
}

/// Game server for a single session
pub struct GameServer {
    controller: FuzzyController,
    race: Race,
    clock: SimulationClock,
    /// Recent tick compute times for averaging
    tick_times: Vec<f32>,
    ticks: u64,
    best_score: u64,
}

impl GameServer {
    /// Create a new session
    pub fn new(config: RaceConfig, now: Instant) -> Self {
        let clock = SimulationClock::new(now, config.max_dt);
        Self::from_parts(Race::new(config), clock)
    }

    /// Create a session with an injected spawn randomness source
    pub fn with_rng(config: RaceConfig, rng: Box<dyn RandomSource + Send>, now: Instant) -> Self {
        let clock = SimulationClock::new(now, config.max_dt);
        Self::from_parts(Race::with_rng(config, rng), clock)
    }

    fn from_parts(race: Race, clock: SimulationClock) -> Self {
        Self {
            controller: FuzzyController::new(),
            race,
            clock,
            tick_times: Vec::with_capacity(TICK_WINDOW),
            ticks: 0,
            best_score: 0,
        }
    }

    /// Start a fresh run: controller smoothing, race state and clock
    pub fn start(&mut self, now: Instant) {
        self.reset(now);
        log::info!("Session started");
    }

    /// Reinitialize controller smoothing and the full race state
    pub fn reset(&mut self, now: Instant) {
        self.record_best();
        self.controller.reset();
        self.race.reset();
        self.clock.reset(now);
        self.tick_times.clear();
    }

    /// Run one frame: perception -> control command -> race update
    pub fn tick(&mut self, frame: &PerceptionFrame, now: Instant) -> TickReport {
        let tick_start = Instant::now();

        let control = self.controller.compute_frame(frame);
        let fuzzy = self.controller.activations(frame);
        let game = self.advance(&control, now);

        self.record_tick_time(tick_start);

        TickReport {
            angle: frame.angle,
            hands: frame.hand_count,
            gesture: frame.gesture,
            control,
            fuzzy,
            game,
        }
    }

    /// Apply an already computed command at wall time `now`
    pub fn advance(&mut self, control: &ControlCommand, now: Instant) -> RaceSnapshot {
        let dt = self.clock.tick(now);
        let was_active = self.race.status() == RaceStatus::Active;

        let snapshot = self
            .race
            .update(control.steering, control.speed, control.nitro, dt);

        self.ticks += 1;
        if was_active && snapshot.game_over {
            self.record_best();
        }
        snapshot
    }

    /// Get current race snapshot without advancing
    pub fn get_snapshot(&self) -> RaceSnapshot {
        self.race.get_snapshot()
    }

    pub fn get_state(&self) -> RaceStatus {
        self.race.status()
    }

    /// Get session statistics
    pub fn get_stats(&self) -> ServerStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        ServerStats {
            ticks: self.ticks,
            avg_tick_time_ms: avg_tick_time,
            traffic_count: self.race.traffic.len() as u32,
            best_score: self.best_score.max(self.race.vehicle.score),
            status: self.race.status(),
        }
    }

    pub fn race(&self) -> &Race {
        &self.race
    }

    pub fn race_mut(&mut self) -> &mut Race {
        &mut self.race
    }

    fn record_best(&mut self) {
        self.best_score = self.best_score.max(self.race.vehicle.score);
    }

    fn record_tick_time(&mut self, tick_start: Instant) {
        let tick_time = tick_start.elapsed().as_secs_f32() * 1000.0;
        self.tick_times.push(tick_time);
        if self.tick_times.len() > TICK_WINDOW {
            self.tick_times.remove(0);
        }
    }
}
