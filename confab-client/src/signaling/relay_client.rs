use crate::error::{Result, SessionError};
use crate::signaling::SignalSink;
use async_trait::async_trait;
use confab_core::{ClientSignal, ServerSignal};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// WebSocket channel to the relay: JSON frames out through a sender task,
/// decoded signals in through an unbounded channel. Dropping the inbound
/// receiver ends the session; dropping the connection ends the sender task.
pub struct RelayConnection {
    outbound: mpsc::UnboundedSender<Message>,
}

impl RelayConnection {
    pub async fn connect(url: &str) -> Result<(Self, mpsc::UnboundedReceiver<ServerSignal>)> {
        info!("Connecting to relay at {}", url);
        let (ws, _) = connect_async(url).await?;
        let (mut write, mut read) = ws.split();

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                if write.send(msg).await.is_err() {
                    break;
                }
            }
            debug!("Relay sender task finished");
        });

        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ServerSignal>(&text) {
                            Ok(signal) => {
                                if inbound_tx.send(signal).is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!("Invalid signal from relay: {}", e),
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    _ => {}
                }
            }
            info!("Relay channel closed");
        });

        Ok((Self { outbound }, inbound_rx))
    }
}

#[async_trait]
impl SignalSink for RelayConnection {
    async fn send(&self, signal: ClientSignal) -> Result<()> {
        let json = serde_json::to_string(&signal)?;
        self.outbound
            .send(Message::Text(json.into()))
            .map_err(|_| SessionError::SignalingClosed)
    }
}
