use async_trait::async_trait;
use confab_client::SignalSink;
use confab_client::error::Result;
use confab_core::{ClientSignal, ConnectionId};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Captures every outbound signal a session produces.
#[derive(Clone, Default)]
pub struct MockSignalSink {
    sent: Arc<Mutex<Vec<ClientSignal>>>,
}

impl MockSignalSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<ClientSignal> {
        self.sent.lock().await.clone()
    }

    pub async fn offers_to(&self, id: &ConnectionId) -> usize {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|s| matches!(s, ClientSignal::Offer { to, .. } if to == id))
            .count()
    }

    pub async fn answers_to(&self, id: &ConnectionId) -> usize {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|s| matches!(s, ClientSignal::Answer { to, .. } if to == id))
            .count()
    }

    /// Poll until at least `count` signals were sent.
    pub async fn wait_for_count(&self, count: usize, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.sent.lock().await.len() >= count {
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
impl SignalSink for MockSignalSink {
    async fn send(&self, signal: ClientSignal) -> Result<()> {
        tracing::debug!("[MockSink] send: {:?}", signal);
        self.sent.lock().await.push(signal);
        Ok(())
    }
}
