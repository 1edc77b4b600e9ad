mod rtc_transport;
mod transport_event;

pub use rtc_transport::*;
pub use transport_event::*;

use crate::error::Result;
use async_trait::async_trait;
use confab_core::ConnectionId;
use std::sync::Arc;
use tokio::sync::mpsc;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// One negotiation-and-media primitive between the local client and a single
/// remote participant. Implementations own description handling and media
/// transport; the peer link drives handshake ordering.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Produce the local offer and record it as the local description.
    async fn create_offer(&self) -> Result<RTCSessionDescription>;

    /// Apply a remote offer, produce the local answer and record it as the
    /// local description.
    async fn answer_offer(&self, offer: RTCSessionDescription) -> Result<RTCSessionDescription>;

    /// Apply the remote answer to an offer this transport produced.
    async fn accept_answer(&self, answer: RTCSessionDescription) -> Result<()>;

    /// Add a remote ICE candidate. Only called once a remote description has
    /// been applied; earlier candidates are buffered by the peer link.
    async fn add_remote_candidate(&self, candidate: RTCIceCandidateInit) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Builds one transport per remote participant, wired to the session's
/// transport-event channel and carrying the local media tracks.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn create(
        &self,
        remote: ConnectionId,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>>;
}
