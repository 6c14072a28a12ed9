//! Fuzzy Racer - Game server
//!
//! Turns hand-tracking readings into driving commands with a fuzzy
//! controller and runs the racing simulation, one session per WebSocket
//! connection.

pub mod config;
pub mod error;
pub mod fuzzy;
pub mod game_server;
pub mod server;

pub use config::ServerConfig;
pub use error::{ConfigError, ServerError};
pub use fuzzy::{ControlCommand, FuzzyController, PerceptionFrame};
pub use game_server::{GameServer, RaceConfig, RaceSnapshot, RaceStatus};

/// Validate the configuration and serve sessions until the listener fails
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let race = config.race_config();
    race.validate()?;

    log::info!(
        "Fuzzy Racer game server initialized (max speed {}, seed {:?})",
        race.max_speed,
        race.rng_seed
    );
    server::serve(&config.addr(), race).await
}
