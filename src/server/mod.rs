//! WebSocket session server
//!
//! Every connection gets its own `GameServer`; frames from the client are
//! applied strictly in arrival order and answered with one reply each.

pub mod protocol;

use std::time::Instant;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use uuid::Uuid;

use crate::error::ServerError;
use crate::game_server::{GameServer, RaceConfig};
use protocol::{ClientMessage, ServerMessage};

/// Accept connections forever, one task per session
pub async fn serve(addr: &str, config: RaceConfig) -> Result<(), ServerError> {
    config.validate()?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    log::info!("WebSocket listening on ws://{}", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        let config = config.clone();

        tokio::spawn(async move {
            let session_id = Uuid::new_v4().to_string();
            log::info!("Session {} connected from {}", session_id, peer);

            if let Err(e) = run_session(stream, &session_id, config).await {
                log::warn!("Session {} ended with error: {}", session_id, e);
            }
            log::info!("Session {} disconnected", session_id);
        });
    }
}

async fn run_session(
    stream: TcpStream,
    session_id: &str,
    config: RaceConfig,
) -> Result<(), ServerError> {
    let ws = accept_async(stream).await?;
    let (mut write, mut read) = ws.split();

    let mut session = GameServer::new(config, Instant::now());

    let welcome = ServerMessage::Welcome {
        session_id: session_id.to_string(),
    };
    write.send(Message::Text(welcome.to_json()?)).await?;

    while let Some(msg) = read.next().await {
        let msg = msg?;
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let reply = match ClientMessage::from_json(&text) {
            Ok(request) => dispatch(&mut session, request, Instant::now()),
            Err(e) => {
                log::warn!("Session {}: bad message: {}", session_id, e);
                ServerMessage::Error {
                    message: e.to_string(),
                }
            }
        };
        write.send(Message::Text(reply.to_json()?)).await?;
    }

    Ok(())
}

/// Apply one client request to a session and build the reply
pub fn dispatch(session: &mut GameServer, request: ClientMessage, now: Instant) -> ServerMessage {
    match request {
        ClientMessage::Frame(frame) => ServerMessage::Tick(session.tick(&frame, now)),
        ClientMessage::Start => {
            session.start(now);
            ServerMessage::Status { status: "started" }
        }
        ClientMessage::Reset => {
            session.reset(now);
            log::info!("Session reset");
            ServerMessage::Status { status: "reset" }
        }
        ClientMessage::State => ServerMessage::State {
            game: session.get_snapshot(),
        },
        ClientMessage::Stats => ServerMessage::Stats(session.get_stats()),
        ClientMessage::Ping => ServerMessage::Pong,
    }
}
