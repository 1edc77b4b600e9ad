use confab_core::{ConnectionId, Participant};
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

/// One transcript entry. `id` is the sender's connection identifier; for
/// locally-sent messages it is our own.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: ConnectionId,
    pub username: String,
    pub message: String,
}

/// Notifications the session surfaces to the embedding UI layer.
pub enum SessionEvent {
    /// The relay assigned us an identifier and the room join went out.
    Joined { id: ConnectionId },

    PeerJoined(Participant),

    PeerLeft(ConnectionId),

    Chat(ChatMessage),

    /// A remote media track for `id` became available.
    RemoteTrack {
        id: ConnectionId,
        username: String,
        track: Arc<TrackRemote>,
    },

    /// The link to `id` failed and was removed from the session.
    LinkClosed(ConnectionId),
}

/// Requests from the embedding layer into a running session loop.
#[derive(Debug)]
pub enum SessionCommand {
    SendChat(String),
    Shutdown,
}
