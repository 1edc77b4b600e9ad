use crate::model::participant::{ConnectionId, Participant};
use serde::{Deserialize, Serialize};
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Signals a client sends to the relay. Handshake payloads name the
/// destination channel; the relay rewrites `to` into `from` on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ClientSignal {
    #[serde(rename = "joinRoom")]
    JoinRoom { room: String, username: String },
    #[serde(rename = "message")]
    Chat {
        room: String,
        message: String,
        username: String,
    },
    #[serde(rename = "webrtc-offer")]
    Offer {
        offer: RTCSessionDescription,
        to: ConnectionId,
        username: String,
    },
    #[serde(rename = "webrtc-answer")]
    Answer {
        answer: RTCSessionDescription,
        to: ConnectionId,
    },
    #[serde(rename = "webrtc-ice-candidates")]
    IceCandidate {
        candidate: RTCIceCandidateInit,
        to: ConnectionId,
    },
}

/// Signals the relay sends to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ServerSignal {
    /// Sent once, immediately after the channel is accepted, carrying the
    /// identifier the relay assigned to it.
    #[serde(rename = "welcome")]
    Welcome { id: ConnectionId },
    /// Sent once to a joining client: everyone already in the room, in join
    /// order, excluding the joiner itself.
    #[serde(rename = "existing-users")]
    ExistingUsers(Vec<Participant>),
    #[serde(rename = "user-joined")]
    UserJoined(Participant),
    #[serde(rename = "user-left")]
    UserLeft(ConnectionId),
    #[serde(rename = "receiveMessage")]
    Chat {
        message: String,
        username: String,
        id: ConnectionId,
    },
    #[serde(rename = "webrtc-offer")]
    Offer {
        offer: RTCSessionDescription,
        from: ConnectionId,
        username: String,
    },
    #[serde(rename = "webrtc-answer")]
    Answer {
        answer: RTCSessionDescription,
        from: ConnectionId,
    },
    #[serde(rename = "webrtc-ice-candidates")]
    IceCandidate {
        candidate: RTCIceCandidateInit,
        from: ConnectionId,
    },
}
