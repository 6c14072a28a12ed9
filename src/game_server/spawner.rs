//! Spawner - Procedural traffic and power-ups
//!
//! Entities appear at the horizon (depth 0) and move toward the player.
//! Traffic spawns on a timer that tightens as the session goes on;
//! power-ups spawn at random while none is on the road.

use serde::{Deserialize, Serialize};

use crate::game_server::random::RandomSource;

/// Depth at which an entity has passed the player and is dropped
pub const DESPAWN_DEPTH: f64 = 1.2;
/// Converts speed into depth units per second
const DEPTH_SCALE: f64 = 0.008;

pub const TRAFFIC_LANES: [f64; 3] = [-0.55, 0.0, 0.55];
pub const POWERUP_LANES: [f64; 3] = [-0.5, 0.0, 0.5];
pub const TRAFFIC_COLORS: [&str; 6] = [
    "#ff4444", "#44ff44", "#4444ff", "#ffff44", "#ff44ff", "#44ffff",
];

/// A slower car sharing the road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficCar {
    pub x: f64,
    pub z: f64,
    pub speed: f64,
    pub color: String,
}

impl TrafficCar {
    pub fn new(x: f64, z: f64, speed: f64) -> Self {
        Self {
            x,
            z,
            speed,
            color: TRAFFIC_COLORS[0].to_string(),
        }
    }
}

/// Pickup effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Nitro,
    Shield,
    Points,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Nitro, PowerUpKind::Shield, PowerUpKind::Points];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub x: f64,
    pub z: f64,
    #[serde(rename = "type")]
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(x: f64, z: f64, kind: PowerUpKind) -> Self {
        Self { x, z, kind }
    }
}

/// Timed traffic generation with a difficulty ramp
#[derive(Debug, Clone)]
pub struct TrafficSpawner {
    spawn_timer: f64,
    max_cars: usize,
}

impl TrafficSpawner {
    const MAX_INTERVAL: f64 = 3.0;
    const MIN_INTERVAL: f64 = 1.5;
    /// Seconds of play that shave one second off the interval
    const RAMP: f64 = 60.0;
    const MIN_SPEED: f64 = 30.0;
    const SPEED_SPREAD: f64 = 30.0;

    pub fn new(max_cars: usize) -> Self {
        Self {
            spawn_timer: 0.0,
            max_cars,
        }
    }

    /// Seconds between spawns after `elapsed` seconds of play
    pub fn interval(elapsed: f64) -> f64 {
        (Self::MAX_INTERVAL - elapsed / Self::RAMP).max(Self::MIN_INTERVAL)
    }

    /// Run the spawn timer and add at most one car at the horizon
    pub fn update(
        &mut self,
        traffic: &mut Vec<TrafficCar>,
        elapsed: f64,
        dt: f64,
        rng: &mut dyn RandomSource,
    ) -> bool {
        self.spawn_timer += dt;
        if self.spawn_timer <= Self::interval(elapsed) || traffic.len() >= self.max_cars {
            return false;
        }
        self.spawn_timer = 0.0;

        let x = TRAFFIC_LANES[rng.index(TRAFFIC_LANES.len())];
        let speed = Self::MIN_SPEED + rng.uniform() * Self::SPEED_SPREAD;
        let color = TRAFFIC_COLORS[rng.index(TRAFFIC_COLORS.len())];

        log::debug!("Spawned traffic car in lane {:+.2} at speed {:.1}", x, speed);
        traffic.push(TrafficCar {
            x,
            z: 0.0,
            speed,
            color: color.to_string(),
        });
        true
    }

    /// Move cars by their speed relative to the player, then drop passed ones.
    /// A car faster than the player drifts back toward the horizon but never
    /// beyond it.
    pub fn advance(traffic: &mut Vec<TrafficCar>, player_speed: f64, dt: f64) {
        for car in traffic.iter_mut() {
            car.z = (car.z + (player_speed - car.speed) * dt * DEPTH_SCALE).max(0.0);
        }
        *traffic = std::mem::take(traffic)
            .into_iter()
            .filter(|c| c.z < DESPAWN_DEPTH)
            .collect();
    }

    pub fn reset(&mut self) {
        self.spawn_timer = 0.0;
    }
}

/// Random power-up generation, one on the road at a time
#[derive(Debug, Clone)]
pub struct PowerUpSpawner {
    max_powerups: usize,
}

impl PowerUpSpawner {
    /// Expected spawns per second while the road is empty
    const RATE: f64 = 0.01 * 60.0;

    pub fn new(max_powerups: usize) -> Self {
        Self { max_powerups }
    }

    pub fn spawn_probability(dt: f64) -> f64 {
        Self::RATE * dt
    }

    pub fn update(&self, powerups: &mut Vec<PowerUp>, dt: f64, rng: &mut dyn RandomSource) -> bool {
        if powerups.len() >= self.max_powerups || rng.uniform() >= Self::spawn_probability(dt) {
            return false;
        }

        let x = POWERUP_LANES[rng.index(POWERUP_LANES.len())];
        let kind = PowerUpKind::ALL[rng.index(PowerUpKind::ALL.len())];

        log::debug!("Spawned {:?} power-up in lane {:+.2}", kind, x);
        powerups.push(PowerUp::new(x, 0.0, kind));
        true
    }

    /// Power-ups are stationary, so they close in at the player's speed
    pub fn advance(powerups: &mut Vec<PowerUp>, player_speed: f64, dt: f64) {
        for powerup in powerups.iter_mut() {
            powerup.z += player_speed * dt * DEPTH_SCALE;
        }
        *powerups = std::mem::take(powerups)
            .into_iter()
            .filter(|p| p.z < DESPAWN_DEPTH)
            .collect();
    }
}
