use async_trait::async_trait;
use confab_client::error::Result;
use confab_client::{PeerTransport, TransportEvent, TransportFactory};
use confab_core::ConnectionId;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use crate::utils::signal_helpers::sdp;

/// Records every handshake interaction instead of negotiating anything.
pub struct MockTransport {
    pub remote: ConnectionId,
    pub applied_offer: Mutex<Option<RTCSessionDescription>>,
    pub applied_answer: Mutex<Option<RTCSessionDescription>>,
    pub candidates: Mutex<Vec<RTCIceCandidateInit>>,
    closed: AtomicBool,
}

impl MockTransport {
    fn new(remote: ConnectionId) -> Self {
        Self {
            remote,
            applied_offer: Mutex::new(None),
            applied_answer: Mutex::new(None),
            candidates: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Poll until this transport is closed.
    pub async fn wait_closed(&self, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.is_closed() {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl PeerTransport for MockTransport {
    async fn create_offer(&self) -> Result<RTCSessionDescription> {
        Ok(sdp("offer", &format!("mock offer for {}", self.remote)))
    }

    async fn answer_offer(&self, offer: RTCSessionDescription) -> Result<RTCSessionDescription> {
        *self.applied_offer.lock().await = Some(offer);
        Ok(sdp("answer", &format!("mock answer for {}", self.remote)))
    }

    async fn accept_answer(&self, answer: RTCSessionDescription) -> Result<()> {
        *self.applied_answer.lock().await = Some(answer);
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: RTCIceCandidateInit) -> Result<()> {
        self.candidates.lock().await.push(candidate);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out `MockTransport`s and remembers every construction, so tests
/// can assert exactly how many primitives a session built and inspect them.
#[derive(Clone, Default)]
pub struct MockTransportFactory {
    created: Arc<Mutex<Vec<(ConnectionId, Arc<MockTransport>)>>>,
}

impl MockTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn created_count(&self) -> usize {
        self.created.lock().await.len()
    }

    pub async fn transport_for(&self, id: &ConnectionId) -> Option<Arc<MockTransport>> {
        self.created
            .lock()
            .await
            .iter()
            .rev()
            .find(|(remote, _)| remote == id)
            .map(|(_, transport)| transport.clone())
    }

    /// Poll until at least `count` transports were constructed.
    pub async fn wait_for_created(&self, count: usize, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.created_count().await >= count {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl TransportFactory for MockTransportFactory {
    async fn create(
        &self,
        remote: ConnectionId,
        _events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>> {
        let transport = Arc::new(MockTransport::new(remote.clone()));
        self.created.lock().await.push((remote, transport.clone()));
        Ok(transport)
    }
}
