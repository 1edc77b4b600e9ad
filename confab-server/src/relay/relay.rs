use crate::relay::RelayEvent;
use crate::room::RoomRegistry;
use crate::signaling::SignalingOutput;
use confab_core::{ClientSignal, ConnectionId, Participant, ServerSignal};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The signaling relay: one event loop owning the room registry, translating
/// each inbound event into zero or more outbound signals.
///
/// Every event is handled to completion before the next one, so registry
/// mutation is never concurrent. The relay holds no state of its own beyond
/// the registry; handshake payloads pass through untouched.
pub struct Relay {
    registry: RoomRegistry,
    events_rx: mpsc::Receiver<RelayEvent>,
    output: Arc<dyn SignalingOutput>,
}

impl Relay {
    pub fn new(events_rx: mpsc::Receiver<RelayEvent>, output: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: RoomRegistry::new(),
            events_rx,
            output,
        }
    }

    pub async fn run(mut self) {
        info!("Relay event loop started");

        while let Some(event) = self.events_rx.recv().await {
            self.handle_event(event).await;
        }

        info!("Relay event loop finished");
    }

    async fn handle_event(&mut self, event: RelayEvent) {
        match event {
            RelayEvent::Inbound(from, signal) => self.handle_signal(from, signal).await,
            RelayEvent::Disconnected(id) => self.handle_disconnect(id).await,
        }
    }

    async fn handle_signal(&mut self, from: ConnectionId, signal: ClientSignal) {
        match signal {
            ClientSignal::JoinRoom { room, username } => {
                self.handle_join(from, room, username).await;
            }
            ClientSignal::Chat {
                message, username, ..
            } => {
                self.handle_chat(from, message, username).await;
            }
            // Handshake signals go to the single named destination with
            // `from` attached. A stale or forged destination is delivered
            // nowhere; the relay does not check it against any room.
            ClientSignal::Offer {
                offer,
                to,
                username,
            } => {
                self.output
                    .send(
                        to,
                        ServerSignal::Offer {
                            offer,
                            from,
                            username,
                        },
                    )
                    .await;
            }
            ClientSignal::Answer { answer, to } => {
                self.output
                    .send(to, ServerSignal::Answer { answer, from })
                    .await;
            }
            ClientSignal::IceCandidate { candidate, to } => {
                self.output
                    .send(to, ServerSignal::IceCandidate { candidate, from })
                    .await;
            }
        }
    }

    async fn handle_join(&mut self, id: ConnectionId, room: String, username: String) {
        info!("{} ({}) joined room '{}'", username, id, room);

        let participant = Participant::new(id.clone(), username);
        let outcome = self.registry.join(&room, participant.clone());

        // A rejoin moves the connection; its old room sees a departure.
        if let Some((displaced, old_room)) = outcome.displaced {
            self.broadcast_left(&old_room, &displaced.id).await;
        }

        self.output
            .send(id, ServerSignal::ExistingUsers(outcome.existing.clone()))
            .await;

        for member in &outcome.existing {
            self.output
                .send(
                    member.id.clone(),
                    ServerSignal::UserJoined(participant.clone()),
                )
                .await;
        }
    }

    async fn handle_chat(&mut self, from: ConnectionId, message: String, username: String) {
        // Routed by the sender's registered room, not the payload field.
        let Some(room) = self.registry.room_of(&from) else {
            debug!("Chat from {} outside any room dropped", from);
            return;
        };
        let room = room.to_string();

        for member in self.registry.members_of(&room) {
            if member.id == from {
                continue;
            }
            self.output
                .send(
                    member.id.clone(),
                    ServerSignal::Chat {
                        message: message.clone(),
                        username: username.clone(),
                        id: from.clone(),
                    },
                )
                .await;
        }
    }

    async fn handle_disconnect(&mut self, id: ConnectionId) {
        let Some((participant, room)) = self.registry.leave(&id) else {
            debug!("Disconnect from unregistered channel {}", id);
            return;
        };

        info!(
            "{} ({}) left room '{}'",
            participant.username, participant.id, room
        );
        self.broadcast_left(&room, &participant.id).await;
    }

    async fn broadcast_left(&self, room: &str, left: &ConnectionId) {
        for member in self.registry.members_of(room) {
            if &member.id == left {
                continue;
            }
            self.output
                .send(member.id.clone(), ServerSignal::UserLeft(left.clone()))
                .await;
        }
    }
}
