use async_trait::async_trait;
use confab_core::{ConnectionId, ServerSignal};

/// Implemented by the delivery layer so the relay can push a signal to a
/// specific channel without knowing how channels are transported.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver `signal` to the channel bound to `to`. An unknown destination
    /// is dropped, never an error.
    async fn send(&self, to: ConnectionId, signal: ServerSignal);
}
