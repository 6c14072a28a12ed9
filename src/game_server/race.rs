//! Race - Session configuration and per-tick simulation state
//!
//! Owns the player car, traffic, power-ups and spawners, and runs the
//! fixed update sequence each tick.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game_server::clock::MAX_DT;
use crate::game_server::collision::{CollisionDetector, CollisionEvent};
use crate::game_server::random::RandomSource;
use crate::game_server::spawner::{PowerUp, PowerUpKind, PowerUpSpawner, TrafficCar, TrafficSpawner};
use crate::game_server::vehicle::{Vehicle, VehicleState};

/// Race configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Player top speed without nitro
    pub max_speed: f64,
    /// Largest integration step (seconds)
    pub max_dt: f64,
    /// Concurrent traffic cars
    pub max_traffic: usize,
    /// Concurrent power-ups
    pub max_powerups: usize,
    /// Seed for spawn randomness, entropy when unset
    pub rng_seed: Option<u64>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            max_speed: 150.0,
            max_dt: MAX_DT,
            max_traffic: 4,
            max_powerups: 1,
            rng_seed: None,
        }
    }
}

impl RaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(ConfigError::MaxSpeed(self.max_speed));
        }
        if !(self.max_dt > 0.0 && self.max_dt <= 1.0) {
            return Err(ConfigError::MaxDt(self.max_dt));
        }
        if self.max_traffic == 0 {
            return Err(ConfigError::TrafficCap);
        }
        Ok(())
    }
}

/// Race status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceStatus {
    Active,
    GameOver,
}

/// Complete race state for one session
pub struct Race {
    /// Race configuration
    pub config: RaceConfig,
    /// The player's car
    pub vehicle: VehicleState,
    /// Cars on the road, horizon first
    pub traffic: Vec<TrafficCar>,
    /// Power-ups on the road
    pub powerups: Vec<PowerUp>,
    traffic_spawner: TrafficSpawner,
    powerup_spawner: PowerUpSpawner,
    rng: Box<dyn RandomSource + Send>,
}

impl Race {
    /// Create a new race; spawns are seeded from the config when it has a seed
    pub fn new(config: RaceConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, Box::new(rng))
    }

    /// Create a race drawing spawn decisions from `rng`
    pub fn with_rng(config: RaceConfig, rng: Box<dyn RandomSource + Send>) -> Self {
        Self {
            vehicle: VehicleState::new(config.max_speed),
            traffic: Vec::new(),
            powerups: Vec::new(),
            traffic_spawner: TrafficSpawner::new(config.max_traffic),
            powerup_spawner: PowerUpSpawner::new(config.max_powerups),
            rng,
            config,
        }
    }

    pub fn status(&self) -> RaceStatus {
        if self.vehicle.flags.game_over {
            RaceStatus::GameOver
        } else {
            RaceStatus::Active
        }
    }

    /// Advance the race by `dt` seconds.
    ///
    /// Once the game is over the state is frozen and this only returns
    /// the current snapshot.
    pub fn update(
        &mut self,
        steering: f64,
        speed_input: f64,
        nitro_input: f64,
        dt: f64,
    ) -> RaceSnapshot {
        if self.status() == RaceStatus::GameOver {
            return self.get_snapshot();
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, self.config.max_dt) } else { 0.0 };

        Vehicle::update(&mut self.vehicle, steering, speed_input, nitro_input, dt);
        let player_speed = self.vehicle.speed;

        self.traffic_spawner.update(
            &mut self.traffic,
            self.vehicle.game_time,
            dt,
            self.rng.as_mut(),
        );
        TrafficSpawner::advance(&mut self.traffic, player_speed, dt);

        self.powerup_spawner
            .update(&mut self.powerups, dt, self.rng.as_mut());
        PowerUpSpawner::advance(&mut self.powerups, player_speed, dt);

        Vehicle::advance_timers(&mut self.vehicle, dt);

        let events = CollisionDetector::resolve(&mut self.vehicle, &mut self.traffic, &mut self.powerups);
        for event in events {
            match event {
                CollisionEvent::Crash => log::info!(
                    "Game over at {:.1}s: score {}, distance {:.0}",
                    self.vehicle.game_time,
                    self.vehicle.score,
                    self.vehicle.distance
                ),
                CollisionEvent::ShieldAbsorbed => log::debug!("Shield absorbed a collision"),
                CollisionEvent::Collected(kind) => log::debug!("Collected {:?} power-up", kind),
            }
        }

        self.get_snapshot()
    }

    /// Reinitialize every entity; the random stream carries on
    pub fn reset(&mut self) {
        self.vehicle = VehicleState::new(self.config.max_speed);
        self.traffic.clear();
        self.powerups.clear();
        self.traffic_spawner.reset();
    }

    /// Get compact snapshot for transfer
    pub fn get_snapshot(&self) -> RaceSnapshot {
        let v = &self.vehicle;
        RaceSnapshot {
            player_x: v.player_x,
            speed: v.speed,
            max_speed: v.max_speed,
            score: v.score,
            distance: v.distance,
            game_time: v.game_time,
            nitro: v.nitro,
            nitro_active: v.flags.nitro_active,
            shield: v.flags.shield,
            invincible: v.flags.invincible,
            game_over: v.flags.game_over,
            road_offset: v.road_offset,
            traffic: self.traffic.iter().map(TrafficSnapshot::from).collect(),
            powerups: self.powerups.iter().map(PowerUpSnapshot::from).collect(),
        }
    }
}

/// Compact race snapshot for network transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub player_x: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub score: u64,
    pub distance: f64,
    pub game_time: f64,
    pub nitro: f64,
    pub nitro_active: bool,
    pub shield: bool,
    pub invincible: bool,
    pub game_over: bool,
    pub road_offset: f64,
    pub traffic: Vec<TrafficSnapshot>,
    pub powerups: Vec<PowerUpSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub x: f64,
    pub z: f64,
    pub color: String,
}

impl From<&TrafficCar> for TrafficSnapshot {
    fn from(car: &TrafficCar) -> Self {
        Self {
            x: car.x,
            z: car.z,
            color: car.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpSnapshot {
    pub x: f64,
    pub z: f64,
    #[serde(rename = "type")]
    pub kind: PowerUpKind,
}

impl From<&PowerUp> for PowerUpSnapshot {
    fn from(powerup: &PowerUp) -> Self {
        Self {
            x: powerup.x,
            z: powerup.z,
            kind: powerup.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_server::random::ScriptedSource;

    fn quiet_race() -> Race {
        Race::with_rng(RaceConfig::default(), Box::new(ScriptedSource::never()))
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(RaceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn bad_config_is_rejected() {
        let config = RaceConfig { max_speed: 0.0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::MaxSpeed(0.0)));
        let config = RaceConfig { max_dt: 2.0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::MaxDt(2.0)));
        let config = RaceConfig { max_traffic: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::TrafficCap));
    }

    #[test]
    fn crash_freezes_the_race() {
        let mut race = quiet_race();
        race.traffic.push(TrafficCar::new(0.0, 0.85, 40.0));

        let snapshot = race.update(0.0, 100.0, 0.0, 0.016);
        assert!(snapshot.game_over);
        assert_eq!(race.status(), RaceStatus::GameOver);

        let frozen = race.update(100.0, 100.0, 100.0, 0.1);
        assert_eq!(frozen, snapshot);
    }

    #[test]
    fn shielded_crash_keeps_racing() {
        let mut race = quiet_race();
        race.vehicle.grant_shield(10.0);
        race.traffic.push(TrafficCar::new(0.0, 0.85, 40.0));

        let snapshot = race.update(0.0, 0.0, 0.0, 0.016);
        assert!(!snapshot.game_over);
        assert!(!snapshot.shield);
        assert!(snapshot.invincible);
        assert_eq!(snapshot.score, 50);
        assert!(snapshot.traffic.is_empty());
    }

    #[test]
    fn dt_is_capped() {
        let mut race = quiet_race();
        race.update(0.0, 100.0, 0.0, 5.0);
        assert!((race.vehicle.game_time - 0.1).abs() < 1e-12);
    }

    #[test]
    fn reset_restores_start_state() {
        let mut race = quiet_race();
        race.traffic.push(TrafficCar::new(0.0, 0.85, 40.0));
        race.update(0.0, 100.0, 0.0, 0.05);
        assert_eq!(race.status(), RaceStatus::GameOver);

        race.reset();
        assert_eq!(race.status(), RaceStatus::Active);
        assert_eq!(race.vehicle, VehicleState::new(150.0));
        assert!(race.traffic.is_empty());
        assert!(race.powerups.is_empty());
    }

    #[test]
    fn snapshot_serializes_expected_shape() {
        let mut race = quiet_race();
        race.powerups.push(PowerUp::new(0.5, 0.1, PowerUpKind::Shield));
        let json = serde_json::to_value(race.get_snapshot()).unwrap();
        assert_eq!(json["max_speed"], 150.0);
        assert_eq!(json["score"], 0);
        assert_eq!(json["powerups"][0]["type"], "shield");
    }
}
