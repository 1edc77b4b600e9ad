use crate::error::Result;
use crate::signaling::SignalSink;
use crate::transport::{PeerTransport, TransportEvent, TransportFactory};
use confab_core::{ClientSignal, Participant};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::track::track_remote::TrackRemote;

/// Negotiation progress of one peer link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Uninitialized,
    OfferSent,
    AnswerSent,
    Connected,
    Closed,
}

/// One direct media link to a single remote participant.
///
/// Owns the transport primitive once constructed, buffers remote candidates
/// that arrive before a remote description is applied, and accumulates
/// remote tracks. Each link lives behind its own mutex, so operations on a
/// link are serialized while different links negotiate independently.
pub struct PeerLink {
    remote: Participant,
    state: LinkState,
    transport: Option<Arc<dyn PeerTransport>>,
    pending_candidates: Vec<RTCIceCandidateInit>,
    remote_tracks: Vec<Arc<TrackRemote>>,
}

impl PeerLink {
    pub fn new(remote: Participant) -> Self {
        Self {
            remote,
            state: LinkState::Uninitialized,
            transport: None,
            pending_candidates: Vec::new(),
            remote_tracks: Vec::new(),
        }
    }

    pub fn remote(&self) -> &Participant {
        &self.remote
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn remote_tracks(&self) -> &[Arc<TrackRemote>] {
        &self.remote_tracks
    }

    /// Call-out path: build the transport, produce the offer, ship it.
    pub async fn start_call(
        &mut self,
        factory: &dyn TransportFactory,
        sink: &dyn SignalSink,
        events: mpsc::Sender<TransportEvent>,
        local_username: &str,
    ) -> Result<()> {
        if self.state != LinkState::Uninitialized {
            debug!(
                "Link to {} already {:?}, not calling again",
                self.remote.id, self.state
            );
            return Ok(());
        }

        let transport = factory.create(self.remote.id.clone(), events).await?;
        let offer = transport.create_offer().await?;
        self.transport = Some(transport);

        sink.send(ClientSignal::Offer {
            offer,
            to: self.remote.id.clone(),
            username: local_username.to_string(),
        })
        .await?;

        self.state = LinkState::OfferSent;
        info!("Sent offer to {}", self.remote.id);
        Ok(())
    }

    /// Answering path: build the transport, apply their offer, ship the
    /// answer back.
    pub async fn accept_offer(
        &mut self,
        offer: RTCSessionDescription,
        factory: &dyn TransportFactory,
        sink: &dyn SignalSink,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<()> {
        if self.state != LinkState::Uninitialized {
            warn!(
                "Duplicate offer from {} ignored (state {:?})",
                self.remote.id, self.state
            );
            return Ok(());
        }

        let transport = factory.create(self.remote.id.clone(), events).await?;
        let answer = transport.answer_offer(offer).await?;
        self.transport = Some(transport);

        sink.send(ClientSignal::Answer {
            answer,
            to: self.remote.id.clone(),
        })
        .await?;

        self.state = LinkState::AnswerSent;
        info!("Sent answer to {}", self.remote.id);
        self.flush_pending_candidates().await;
        Ok(())
    }

    /// Apply the remote answer to our offer. An answer arriving in any state
    /// other than `OfferSent` is never applied.
    pub async fn accept_answer(&mut self, answer: RTCSessionDescription) -> Result<()> {
        if self.state != LinkState::OfferSent {
            warn!(
                "Answer from {} in state {:?} ignored",
                self.remote.id, self.state
            );
            return Ok(());
        }

        let Some(transport) = &self.transport else {
            return Ok(());
        };
        transport.accept_answer(answer).await?;

        self.state = LinkState::Connected;
        info!("Link to {} connected", self.remote.id);
        self.flush_pending_candidates().await;
        Ok(())
    }

    /// Candidates keep arriving in every live state; before a remote
    /// description is applied they are buffered, afterwards they go straight
    /// to the transport.
    pub async fn add_remote_candidate(&mut self, candidate: RTCIceCandidateInit) -> Result<()> {
        match self.state {
            LinkState::Closed => {}
            LinkState::Uninitialized | LinkState::OfferSent => {
                self.pending_candidates.push(candidate);
            }
            LinkState::AnswerSent | LinkState::Connected => {
                if let Some(transport) = &self.transport {
                    transport.add_remote_candidate(candidate).await?;
                }
            }
        }
        Ok(())
    }

    async fn flush_pending_candidates(&mut self) {
        let Some(transport) = &self.transport else {
            return;
        };
        for candidate in self.pending_candidates.drain(..) {
            if let Err(e) = transport.add_remote_candidate(candidate).await {
                warn!(
                    "Failed to apply buffered candidate for {}: {}",
                    self.remote.id, e
                );
            }
        }
    }

    pub fn push_remote_track(&mut self, track: Arc<TrackRemote>) {
        if self.state != LinkState::Closed {
            self.remote_tracks.push(track);
        }
    }

    /// Terminal transition: release the transport and media. Everything that
    /// arrives for this link afterwards is dropped.
    pub async fn close(&mut self) {
        if self.state == LinkState::Closed {
            return;
        }

        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport.close().await {
                warn!("Failed to close transport for {}: {}", self.remote.id, e);
            }
        }

        self.remote_tracks.clear();
        self.pending_candidates.clear();
        self.state = LinkState::Closed;
    }
}
