//! Vehicle - Player car state and kinematics
//!
//! The player's car has lane position, speed, a nitro reserve and the
//! timed shield / invincibility effects. The simulation integrates it
//! once per tick from the control command.

use serde::{Deserialize, Serialize};

/// Lane position bound on either side of the road centre
pub const LANE_LIMIT: f64 = 0.8;
/// Nitro lets the car exceed its nominal top speed by this factor
pub const NITRO_SPEED_CAP: f64 = 1.3;
pub const NITRO_CAPACITY: f64 = 100.0;

/// Vehicle state flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleFlags {
    pub nitro_active: bool,
    pub shield: bool,
    pub invincible: bool,
    pub game_over: bool,
}

/// Complete state of the player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Lane position, -0.8 (left edge) .. 0.8 (right edge)
    pub player_x: f64,
    /// Current speed
    pub speed: f64,
    /// Nominal top speed without nitro
    pub max_speed: f64,
    /// Nitro reserve (0-100)
    pub nitro: f64,
    /// Remaining shield time (seconds)
    pub shield_timer: f64,
    /// Remaining invincibility time (seconds)
    pub invincible_timer: f64,
    pub score: u64,
    pub distance: f64,
    /// Session time (seconds)
    pub game_time: f64,
    /// Road stripe phase (0-1, repeating)
    pub road_offset: f64,
    /// Status flags
    pub flags: VehicleFlags,
}

impl VehicleState {
    /// Fresh car at rest in the centre lane with a full nitro tank
    pub fn new(max_speed: f64) -> Self {
        Self {
            player_x: 0.0,
            speed: 0.0,
            max_speed,
            nitro: NITRO_CAPACITY,
            shield_timer: 0.0,
            invincible_timer: 0.0,
            score: 0,
            distance: 0.0,
            game_time: 0.0,
            road_offset: 0.0,
            flags: VehicleFlags::default(),
        }
    }

    /// Reset the car to its starting condition
    pub fn reset(&mut self) {
        *self = Self::new(self.max_speed);
    }

    pub fn top_speed(&self) -> f64 {
        self.max_speed * NITRO_SPEED_CAP
    }

    pub fn grant_shield(&mut self, seconds: f64) {
        self.flags.shield = true;
        self.shield_timer = seconds;
    }

    pub fn grant_invincibility(&mut self, seconds: f64) {
        self.flags.invincible = true;
        self.invincible_timer = seconds;
    }

    pub fn add_nitro(&mut self, amount: f64) {
        self.nitro = (self.nitro + amount).min(NITRO_CAPACITY);
    }
}

/// Vehicle simulation logic
pub struct Vehicle;

impl Vehicle {
    /// Constants
    const ACCELERATION: f64 = 80.0;
    const DECELERATION: f64 = 100.0;
    const NITRO_BURN: f64 = 30.0;
    const NITRO_REGEN: f64 = 10.0;
    const NITRO_BOOST: f64 = 1.4;
    const NITRO_THRESHOLD: f64 = 50.0;
    const STEER_RATE: f64 = 1.5;
    const SCORE_PER_UNIT: f64 = 0.3;
    const ROAD_SCROLL: f64 = 0.01;

    /// Integrate speed, lane position and progress for one tick
    pub fn update(
        state: &mut VehicleState,
        steering: f64,
        speed_input: f64,
        nitro_input: f64,
        dt: f64,
    ) {
        state.game_time += dt;

        // Target speed, boosted while nitro burns
        let mut target = (speed_input / 100.0) * state.max_speed;
        if nitro_input > Self::NITRO_THRESHOLD && state.nitro > 0.0 {
            state.flags.nitro_active = true;
            state.nitro = (state.nitro - Self::NITRO_BURN * dt).max(0.0);
            target = state.top_speed().min(target * Self::NITRO_BOOST);
        } else {
            state.flags.nitro_active = false;
            state.nitro = (state.nitro + Self::NITRO_REGEN * dt).min(NITRO_CAPACITY);
        }

        // Accelerating is gentler than braking
        if target > state.speed {
            state.speed += Self::ACCELERATION * dt;
        } else {
            state.speed -= Self::DECELERATION * dt;
        }
        state.speed = state.speed.clamp(0.0, state.top_speed());

        state.player_x += (steering / 100.0) * Self::STEER_RATE * dt;
        state.player_x = state.player_x.clamp(-LANE_LIMIT, LANE_LIMIT);

        // Progress
        let travelled = state.speed * dt;
        state.distance += travelled;
        state.score += (travelled * Self::SCORE_PER_UNIT).floor() as u64;

        state.road_offset += travelled * Self::ROAD_SCROLL;
        state.road_offset %= 1.0;
    }

    /// Count down the shield and invincibility windows
    pub fn advance_timers(state: &mut VehicleState, dt: f64) {
        if state.flags.shield {
            state.shield_timer -= dt;
            if state.shield_timer <= 0.0 {
                state.flags.shield = false;
                state.shield_timer = 0.0;
            }
        }

        if state.flags.invincible {
            state.invincible_timer -= dt;
            if state.invincible_timer <= 0.0 {
                state.flags.invincible = false;
                state.invincible_timer = 0.0;
            }
        }
    }
}
