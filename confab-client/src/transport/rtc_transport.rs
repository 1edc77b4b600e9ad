use crate::error::Result;
use crate::transport::{PeerTransport, TransportEvent, TransportFactory};
use async_trait::async_trait;
use confab_core::{ConnectionId, IceServerConfig};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::track::track_local::TrackLocal;

/// Used when the caller supplies no ICE configuration.
pub const DEFAULT_STUN_SERVERS: &[&str] = &[
    "stun:stun.l.google.com:19302",
    "stun:stun1.l.google.com:19302",
];

/// Builds `RtcTransport`s: one `RTCPeerConnection` per remote participant,
/// all sharing the local media tracks handed in at construction. Media
/// acquisition happens outside; an empty track list just means links carry
/// no outbound media.
pub struct RtcTransportFactory {
    ice_servers: Vec<IceServerConfig>,
    local_tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>,
}

impl RtcTransportFactory {
    pub fn new(
        ice_servers: Vec<IceServerConfig>,
        local_tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>,
    ) -> Self {
        Self {
            ice_servers,
            local_tracks,
        }
    }

    pub fn with_default_stun(local_tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>) -> Self {
        let stun = IceServerConfig {
            urls: DEFAULT_STUN_SERVERS.iter().map(|s| s.to_string()).collect(),
            username: None,
            credential: None,
        };
        Self::new(vec![stun], local_tracks)
    }
}

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    async fn create(
        &self,
        remote: ConnectionId,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = self
            .ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
            })
            .collect();

        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let pc = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = events.clone();
        let remote_state = remote.clone();
        pc.on_peer_connection_state_change(Box::new(move |state: RTCPeerConnectionState| {
            let tx = state_tx.clone();
            let remote = remote_state.clone();

            Box::pin(async move {
                info!("Peer connection state for {}: {:?}", remote, state);
                match state {
                    RTCPeerConnectionState::Failed
                    | RTCPeerConnectionState::Disconnected
                    | RTCPeerConnectionState::Closed => {
                        let _ = tx.send(TransportEvent::Failed(remote)).await;
                    }
                    _ => {}
                }
            })
        }));

        // Trickle ICE: local candidates travel to the remote via the relay.
        let ice_tx = events.clone();
        let remote_ice = remote.clone();
        pc.on_ice_candidate(Box::new(move |candidate: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let remote = remote_ice.clone();

            Box::pin(async move {
                let Some(candidate) = candidate else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(remote, init))
                    .await;
            })
        }));

        let track_tx = events.clone();
        let remote_track = remote.clone();
        pc.on_track(Box::new(move |track, _receiver, _transceiver| {
            let tx = track_tx.clone();
            let remote = remote_track.clone();

            Box::pin(async move {
                debug!("Remote track from {}: {}", remote, track.id());
                let _ = tx.send(TransportEvent::TrackReceived(remote, track)).await;
            })
        }));

        for track in &self.local_tracks {
            pc.add_track(Arc::clone(track)).await?;
        }

        Ok(Arc::new(RtcTransport { pc }))
    }
}

/// `PeerTransport` over a `webrtc` peer connection.
pub struct RtcTransport {
    pc: Arc<RTCPeerConnection>,
}

#[async_trait]
impl PeerTransport for RtcTransport {
    async fn create_offer(&self) -> Result<RTCSessionDescription> {
        let offer = self.pc.create_offer(None).await?;
        self.pc.set_local_description(offer.clone()).await?;
        Ok(offer)
    }

    async fn answer_offer(&self, offer: RTCSessionDescription) -> Result<RTCSessionDescription> {
        self.pc.set_remote_description(offer).await?;
        let answer = self.pc.create_answer(None).await?;
        self.pc.set_local_description(answer.clone()).await?;
        Ok(answer)
    }

    async fn accept_answer(&self, answer: RTCSessionDescription) -> Result<()> {
        self.pc.set_remote_description(answer).await?;
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: RTCIceCandidateInit) -> Result<()> {
        self.pc.add_ice_candidate(candidate).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pc.close().await?;
        Ok(())
    }
}
