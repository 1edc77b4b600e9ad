use confab_core::ConnectionId;
use std::sync::Arc;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::track::track_remote::TrackRemote;

/// Asynchronous notifications out of a peer transport, tagged with the
/// remote participant the transport belongs to.
pub enum TransportEvent {
    /// The primitive produced a local candidate to trickle to the remote.
    CandidateGenerated(ConnectionId, RTCIceCandidateInit),

    /// A remote media track started arriving.
    TrackReceived(ConnectionId, Arc<TrackRemote>),

    /// The primitive failed or closed underneath us.
    Failed(ConnectionId),
}
