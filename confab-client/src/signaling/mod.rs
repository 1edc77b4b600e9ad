mod relay_client;

pub use relay_client::*;

use crate::error::Result;
use async_trait::async_trait;
use confab_core::ClientSignal;

/// The injected "send a signal to the relay" capability. Peer links and the
/// session never see the wire underneath it.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn send(&self, signal: ClientSignal) -> Result<()>;
}
