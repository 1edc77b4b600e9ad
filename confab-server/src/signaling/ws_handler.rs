use crate::relay::RelayEvent;
use crate::signaling::SignalingService;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use confab_core::{ClientSignal, ConnectionId, ServerSignal};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Shared axum state: the delivery service plus the relay loop's inbox.
pub struct AppState {
    pub signaling: SignalingService,
    pub relay_tx: mpsc::Sender<RelayEvent>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // The relay owns identity: fresh id per accepted channel, stable until
    // the channel closes.
    let id = ConnectionId::new();
    info!("New channel connected: {}", id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.signaling.add_peer(id.clone(), tx.clone());
    let _ = tx.send(ServerSignal::Welcome { id: id.clone() });

    let mut send_task = tokio::spawn(async move {
        while let Some(signal) = rx.recv().await {
            match serde_json::to_string(&signal) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!("Failed to serialize signal: {}", e),
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();
        let id = id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientSignal>(&text) {
                        Ok(signal) => {
                            if state
                                .relay_tx
                                .send(RelayEvent::Inbound(id.clone(), signal))
                                .await
                                .is_err()
                            {
                                error!("Relay loop gone");
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid signal from {}: {:?}", id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Exactly one departure per channel, however the tasks ended.
    state.signaling.remove_peer(&id);
    let _ = state.relay_tx.send(RelayEvent::Disconnected(id.clone())).await;
    info!("Channel disconnected: {}", id);
}
