use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use confab_core::{ConnectionId, ServerSignal};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

struct SignalingInner {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<ServerSignal>>,
}

/// Outbound delivery: one unbounded channel per connected client, registered
/// by its socket handler for as long as the channel lives.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
        }
    }

    pub fn add_peer(&self, id: ConnectionId, tx: mpsc::UnboundedSender<ServerSignal>) {
        self.inner.peers.insert(id, tx);
    }

    pub fn remove_peer(&self, id: &ConnectionId) {
        self.inner.peers.remove(id);
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send(&self, to: ConnectionId, signal: ServerSignal) {
        if let Some(peer) = self.inner.peers.get(&to) {
            if let Err(e) = peer.send(signal) {
                error!("Failed to queue signal for {}: {:?}", to, e);
            }
        } else {
            debug!("Dropping signal for disconnected channel {}", to);
        }
    }
}
