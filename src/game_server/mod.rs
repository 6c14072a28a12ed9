//! Game Server Module
//!
//! Deterministic, tick-driven racing simulation: player kinematics,
//! traffic and power-up spawning, collisions and timed effects.
//! Each session owns its own `GameServer`.

pub mod clock;
pub mod collision;
pub mod race;
pub mod random;
pub mod simulation;
pub mod spawner;
pub mod vehicle;

pub use clock::SimulationClock;
pub use collision::{CollisionDetector, CollisionEvent};
pub use race::{Race, RaceConfig, RaceSnapshot, RaceStatus};
pub use random::{RandomSource, ScriptedSource};
pub use simulation::{GameServer, ServerStats, TickReport};
pub use spawner::{PowerUp, PowerUpKind, PowerUpSpawner, TrafficCar, TrafficSpawner};
pub use vehicle::{Vehicle, VehicleState};
