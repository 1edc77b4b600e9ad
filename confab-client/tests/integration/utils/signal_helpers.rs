use confab_client::{LinkState, Session, SessionEvent};
use confab_core::ConnectionId;
use tokio::sync::mpsc;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// Timeout for spawned negotiation steps to land (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 2000;

/// Build a session description without going through a peer connection.
/// Deserialization does not parse the SDP body, so any text will do.
pub fn sdp(kind: &str, sdp: &str) -> RTCSessionDescription {
    serde_json::from_value(serde_json::json!({ "type": kind, "sdp": sdp }))
        .expect("static SDP deserializes")
}

pub fn candidate(tag: u32) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: format!("candidate:{tag} 1 udp 2130706431 192.0.2.7 50000 typ host"),
        sdp_mid: Some("0".to_string()),
        sdp_mline_index: Some(0),
        username_fragment: None,
    }
}

/// Poll until the link for `id` reaches `state`.
pub async fn wait_for_state(
    session: &Session,
    id: &ConnectionId,
    state: LinkState,
    timeout_ms: u64,
) -> bool {
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    loop {
        if session.link_state(id).await == Some(state) {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

/// Receive the next session event within the timeout.
pub async fn next_event(
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    timeout_ms: u64,
) -> Option<SessionEvent> {
    tokio::time::timeout(std::time::Duration::from_millis(timeout_ms), events.recv())
        .await
        .ok()
        .flatten()
}

/// Skip ahead to the first event matching `pred`, dropping everything
/// before it.
pub async fn wait_for_event<F>(
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    timeout_ms: u64,
    mut pred: F,
) -> Option<SessionEvent>
where
    F: FnMut(&SessionEvent) -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    while start.elapsed() <= timeout {
        match next_event(events, 50).await {
            Some(event) if pred(&event) => return Some(event),
            Some(_) => continue,
            None => continue,
        }
    }
    None
}
