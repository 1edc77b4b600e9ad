use confab_core::{ClientSignal, ConnectionId};

/// Events feeding the relay loop from the per-connection channel handlers.
#[derive(Debug)]
pub enum RelayEvent {
    /// A decoded signal from a connected client.
    Inbound(ConnectionId, ClientSignal),

    /// The channel closed underneath the client. Transport-level, never
    /// client-sent.
    Disconnected(ConnectionId),
}
