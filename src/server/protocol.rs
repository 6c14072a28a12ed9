//! Protocol - JSON messages exchanged with a WebSocket client

use serde::{Deserialize, Serialize};

use crate::fuzzy::PerceptionFrame;
use crate::game_server::{RaceSnapshot, ServerStats, TickReport};

/// Client to server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// One perception reading; advances the simulation by one tick
    Frame(PerceptionFrame),
    Start,
    Reset,
    State,
    Stats,
    Ping,
}

/// Server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome { session_id: String },
    Tick(TickReport),
    State { game: RaceSnapshot },
    Stats(ServerStats),
    Status { status: &'static str },
    Pong,
    Error { message: String },
}

impl ClientMessage {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
