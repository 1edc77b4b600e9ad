pub mod model;

pub use model::{ClientSignal, ConnectionId, IceServerConfig, Participant, ServerSignal};
