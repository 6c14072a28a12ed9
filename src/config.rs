//! Server configuration from the command line

use clap::Parser;
use tracing::Level;

use crate::game_server::RaceConfig;

/// Fuzzy Racer game server
#[derive(Parser, Debug, Clone)]
#[command(name = "fuzzy-racer")]
#[command(author, version, about = "Gesture-driven racing game server with fuzzy control", long_about = None)]
pub struct ServerConfig {
    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Server port
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Player top speed without nitro
    #[arg(long, default_value_t = 150.0)]
    pub max_speed: f64,

    /// Seed for traffic and power-up spawning
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    pub fn race_config(&self) -> RaceConfig {
        RaceConfig {
            max_speed: self.max_speed,
            rng_seed: self.seed,
            ..Default::default()
        }
    }
}
