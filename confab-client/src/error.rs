use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("peer transport error: {0}")]
    Transport(#[from] webrtc::Error),

    #[error("relay channel closed")]
    SignalingClosed,

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("failed to encode signal: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
