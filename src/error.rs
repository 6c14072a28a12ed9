//! Error types for configuration and the session server
//!
//! The simulation core itself is infallible; only setup and transport fail.

use std::io;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Rejected race configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max speed must be positive, got {0}")]
    MaxSpeed(f64),

    #[error("max dt must be in (0, 1] seconds, got {0}")]
    MaxDt(f64),

    #[error("traffic cap must be at least 1")]
    TrafficCap,
}

/// Session server failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
