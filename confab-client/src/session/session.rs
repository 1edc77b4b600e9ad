use crate::link::{LinkState, PeerLink};
use crate::session::{ChatMessage, SessionCommand, SessionEvent};
use crate::signaling::SignalSink;
use crate::transport::{TransportEvent, TransportFactory};
use confab_core::{ClientSignal, ConnectionId, Participant, ServerSignal};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::track::track_remote::TrackRemote;

/// The client session: owns the authoritative map from remote identifier to
/// peer link, turns relayed signals into link transitions, and surfaces
/// membership, chat and media changes to the embedding layer.
///
/// Per-link negotiation steps run in spawned tasks serialized by each link's
/// own mutex, so two links can be mid-negotiation at once while operations
/// on any single link stay ordered.
pub struct Session {
    room: String,
    username: String,
    local_id: Option<ConnectionId>,
    links: HashMap<ConnectionId, Arc<Mutex<PeerLink>>>,
    transcript: Vec<ChatMessage>,
    sink: Arc<dyn SignalSink>,
    factory: Arc<dyn TransportFactory>,
    transport_tx: mpsc::Sender<TransportEvent>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl Session {
    pub fn new(
        room: impl Into<String>,
        username: impl Into<String>,
        sink: Arc<dyn SignalSink>,
        factory: Arc<dyn TransportFactory>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (transport_tx, transport_rx) = mpsc::channel(256);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let session = Self {
            room: room.into(),
            username: username.into(),
            local_id: None,
            links: HashMap::new(),
            transcript: Vec::new(),
            sink,
            factory,
            transport_tx,
            transport_rx,
            events_tx,
        };

        (session, events_rx)
    }

    /// Drive the session until the relay channel closes or the embedding
    /// layer asks for shutdown.
    pub async fn run(
        mut self,
        mut signals: mpsc::UnboundedReceiver<ServerSignal>,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    ) {
        info!("Session loop started");

        loop {
            tokio::select! {
                signal = signals.recv() => {
                    match signal {
                        Some(signal) => self.handle_signal(signal).await,
                        None => {
                            info!("Relay channel closed, ending session");
                            break;
                        }
                    }
                }

                Some(event) = self.transport_rx.recv() => {
                    self.handle_transport_event(event).await;
                }

                Some(command) = commands.recv() => {
                    match command {
                        SessionCommand::SendChat(message) => self.send_chat(message).await,
                        SessionCommand::Shutdown => break,
                    }
                }
            }
        }

        self.shutdown().await;
        info!("Session loop finished");
    }

    pub fn local_id(&self) -> Option<&ConnectionId> {
        self.local_id.as_ref()
    }

    /// The append-only chat transcript, own messages included.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub async fn peers(&self) -> Vec<Participant> {
        let mut peers = Vec::with_capacity(self.links.len());
        for link in self.links.values() {
            peers.push(link.lock().await.remote().clone());
        }
        peers
    }

    pub async fn link_state(&self, id: &ConnectionId) -> Option<LinkState> {
        match self.links.get(id) {
            Some(link) => Some(link.lock().await.state()),
            None => None,
        }
    }

    pub async fn remote_tracks(&self, id: &ConnectionId) -> Vec<Arc<TrackRemote>> {
        match self.links.get(id) {
            Some(link) => link.lock().await.remote_tracks().to_vec(),
            None => Vec::new(),
        }
    }

    pub async fn handle_signal(&mut self, signal: ServerSignal) {
        match signal {
            ServerSignal::Welcome { id } => {
                info!("Relay assigned id {}", id);
                self.local_id = Some(id.clone());

                let join = ClientSignal::JoinRoom {
                    room: self.room.clone(),
                    username: self.username.clone(),
                };
                if let Err(e) = self.sink.send(join).await {
                    warn!("Failed to send join: {}", e);
                    return;
                }
                let _ = self.events_tx.send(SessionEvent::Joined { id });
            }

            ServerSignal::ExistingUsers(existing) => {
                // We are the newcomer; we call everyone already present.
                for participant in existing {
                    let _ = self
                        .events_tx
                        .send(SessionEvent::PeerJoined(participant.clone()));
                    self.call_peer(participant).await;
                }
            }

            ServerSignal::UserJoined(participant) => {
                // The newcomer calls us; nothing to create proactively.
                let _ = self.events_tx.send(SessionEvent::PeerJoined(participant));
            }

            ServerSignal::UserLeft(id) => {
                if let Some(link) = self.links.remove(&id) {
                    tokio::spawn(async move {
                        link.lock().await.close().await;
                    });
                }
                let _ = self.events_tx.send(SessionEvent::PeerLeft(id));
            }

            ServerSignal::Chat {
                message,
                username,
                id,
            } => {
                let entry = ChatMessage {
                    id,
                    username,
                    message,
                };
                self.transcript.push(entry.clone());
                let _ = self.events_tx.send(SessionEvent::Chat(entry));
            }

            ServerSignal::Offer {
                offer,
                from,
                username,
            } => {
                self.handle_offer(offer, from, username).await;
            }

            ServerSignal::Answer { answer, from } => {
                let Some(link) = self.links.get(&from) else {
                    debug!("Answer from unknown peer {} dropped", from);
                    return;
                };
                let link = link.clone();
                tokio::spawn(async move {
                    if let Err(e) = link.lock().await.accept_answer(answer).await {
                        warn!("Failed to apply answer from {}: {}", from, e);
                    }
                });
            }

            ServerSignal::IceCandidate { candidate, from } => {
                let Some(link) = self.links.get(&from) else {
                    debug!("Candidate from unknown peer {} dropped", from);
                    return;
                };
                let link = link.clone();
                tokio::spawn(async move {
                    if let Err(e) = link.lock().await.add_remote_candidate(candidate).await {
                        warn!("Failed to add candidate from {}: {}", from, e);
                    }
                });
            }
        }
    }

    pub async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGenerated(id, candidate) => {
                self.send_candidate(id, candidate).await;
            }

            TransportEvent::TrackReceived(id, track) => {
                let Some(link) = self.links.get(&id) else {
                    debug!("Track from removed peer {} dropped", id);
                    return;
                };
                let username = {
                    let mut link = link.lock().await;
                    link.push_remote_track(track.clone());
                    link.remote().username.clone()
                };
                let _ = self.events_tx.send(SessionEvent::RemoteTrack {
                    id,
                    username,
                    track,
                });
            }

            TransportEvent::Failed(id) => {
                let Some(link) = self.links.remove(&id) else {
                    return;
                };
                warn!("Transport for {} failed, closing link", id);
                tokio::spawn(async move {
                    link.lock().await.close().await;
                });
                let _ = self.events_tx.send(SessionEvent::LinkClosed(id));
            }
        }
    }

    /// Send a chat line. The relay never echoes to the sender, so the local
    /// entry is recorded directly.
    pub async fn send_chat(&mut self, message: String) {
        let signal = ClientSignal::Chat {
            room: self.room.clone(),
            message: message.clone(),
            username: self.username.clone(),
        };
        if let Err(e) = self.sink.send(signal).await {
            warn!("Failed to send chat: {}", e);
            return;
        }

        if let Some(id) = &self.local_id {
            let entry = ChatMessage {
                id: id.clone(),
                username: self.username.clone(),
                message,
            };
            self.transcript.push(entry.clone());
            let _ = self.events_tx.send(SessionEvent::Chat(entry));
        }
    }

    /// Close every link and clear the map.
    pub async fn shutdown(&mut self) {
        info!("Shutting down session, closing {} links", self.links.len());
        for (_, link) in self.links.drain() {
            link.lock().await.close().await;
        }
    }

    async fn call_peer(&mut self, participant: Participant) {
        if self.links.contains_key(&participant.id) {
            debug!("Link to {} already exists, not calling again", participant.id);
            return;
        }

        let link = Arc::new(Mutex::new(PeerLink::new(participant.clone())));
        self.links.insert(participant.id.clone(), link.clone());

        let factory = self.factory.clone();
        let sink = self.sink.clone();
        let events = self.transport_tx.clone();
        let username = self.username.clone();

        tokio::spawn(async move {
            let result = link
                .lock()
                .await
                .start_call(factory.as_ref(), sink.as_ref(), events, &username)
                .await;
            if let Err(e) = result {
                warn!("Call to {} failed: {}", participant.id, e);
            }
        });
    }

    async fn handle_offer(
        &mut self,
        offer: RTCSessionDescription,
        from: ConnectionId,
        username: String,
    ) {
        // The presence check keyed by remote id is the duplicate-offer
        // guard: one transport per remote, ever.
        if self.links.contains_key(&from) {
            warn!("Duplicate offer from {} ignored", from);
            return;
        }

        let participant = Participant::new(from.clone(), username);
        let link = Arc::new(Mutex::new(PeerLink::new(participant)));
        self.links.insert(from.clone(), link.clone());

        let factory = self.factory.clone();
        let sink = self.sink.clone();
        let events = self.transport_tx.clone();

        tokio::spawn(async move {
            let result = link
                .lock()
                .await
                .accept_offer(offer, factory.as_ref(), sink.as_ref(), events)
                .await;
            if let Err(e) = result {
                warn!("Failed to answer offer from {}: {}", from, e);
            }
        });
    }

    async fn send_candidate(&self, to: ConnectionId, candidate: RTCIceCandidateInit) {
        // Late trickle from a link that was already torn down.
        if !self.links.contains_key(&to) {
            debug!("Candidate for removed peer {} dropped", to);
            return;
        }

        let signal = ClientSignal::IceCandidate { candidate, to };
        if let Err(e) = self.sink.send(signal).await {
            warn!("Failed to send candidate: {}", e);
        }
    }
}
