//! Minimal headless client: join a room and log membership, chat and media
//! until the relay goes away.
//!
//! `CONFAB_RELAY_URL`, `CONFAB_ROOM` and `CONFAB_USERNAME` control the
//! session; defaults target a local relay. No capture layer is wired in, so
//! links form without outbound media.

use std::env;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Level, info};

use confab_client::error::Result;
use confab_client::{RelayConnection, RtcTransportFactory, Session, SessionCommand, SessionEvent};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let url =
        env::var("CONFAB_RELAY_URL").unwrap_or_else(|_| "ws://127.0.0.1:4000/ws".to_string());
    let room = env::var("CONFAB_ROOM").unwrap_or_else(|_| "lobby".to_string());
    let username = env::var("CONFAB_USERNAME").unwrap_or_else(|_| "guest".to_string());

    let (connection, signals) = RelayConnection::connect(&url).await?;
    let factory = RtcTransportFactory::with_default_stun(Vec::new());

    let (session, mut events) =
        Session::new(room, username, Arc::new(connection), Arc::new(factory));
    let (_commands, commands_rx) = mpsc::unbounded_channel::<SessionCommand>();
    tokio::spawn(session.run(signals, commands_rx));

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Joined { id } => info!("joined as {}", id),
            SessionEvent::PeerJoined(p) => info!("{} ({}) is here", p.username, p.id),
            SessionEvent::PeerLeft(id) => info!("{} left", id),
            SessionEvent::Chat(m) => info!("<{}> {}", m.username, m.message),
            SessionEvent::RemoteTrack { username, .. } => {
                info!("receiving media from {}", username)
            }
            SessionEvent::LinkClosed(id) => info!("link to {} closed", id),
        }
    }

    Ok(())
}
