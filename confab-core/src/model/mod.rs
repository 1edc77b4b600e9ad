mod participant;
mod signaling;

pub use participant::{ConnectionId, Participant};
pub use signaling::{ClientSignal, IceServerConfig, ServerSignal};
