pub mod error;
pub mod link;
pub mod session;
pub mod signaling;
pub mod transport;

pub use error::SessionError;
pub use link::{LinkState, PeerLink};
pub use session::{ChatMessage, Session, SessionCommand, SessionEvent};
pub use signaling::{RelayConnection, SignalSink};
pub use transport::{
    DEFAULT_STUN_SERVERS, PeerTransport, RtcTransportFactory, TransportEvent, TransportFactory,
};
