pub mod relay;
pub mod room;
pub mod signaling;

pub use relay::{Relay, RelayEvent};
pub use room::{JoinOutcome, RoomRegistry};
pub use signaling::{AppState, SignalingOutput, SignalingService, ws_handler};
