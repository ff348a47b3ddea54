use crate::media::LocalTracks;
use crate::transport::{
    PeerConnectionState, PeerConnector, PeerTransport, TransportConfig, TransportEvent,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use huddle_core::{CallError, IceCandidate, SdpKind, SessionDescription, Username};
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

/// [`PeerConnector`] backed by webrtc-rs.
#[derive(Clone, Default)]
pub struct WebRtcConnector {
    config: TransportConfig,
}

impl WebRtcConnector {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PeerConnector for WebRtcConnector {
    async fn open(
        &self,
        peer: &Username,
        generation: u64,
        tracks: &LocalTracks,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>, CallError> {
        let transport = WebRtcTransport::new(peer.clone(), generation, &self.config, tracks, events)
            .await
            .map_err(peer_error)?;
        Ok(Box::new(transport))
    }
}

pub struct WebRtcTransport {
    pub peer: Username,
    pub peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcTransport {
    /// Builds the peer connection, attaches the local tracks and wires its
    /// callbacks into `event_tx`.
    pub async fn new(
        peer: Username,
        generation: u64,
        config: &TransportConfig,
        tracks: &LocalTracks,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        for track in tracks.iter() {
            let Some(rtc_track) = track.rtc_track() else {
                continue;
            };
            let sender = peer_connection
                .add_track(rtc_track)
                .await
                .context("Failed to attach local track")?;

            // RTCP has to be drained for the interceptors to keep working.
            tokio::spawn(async move {
                let mut rtcp_buf = vec![0u8; 1500];
                while sender.read(&mut rtcp_buf).await.is_ok() {}
            });
        }

        let state_tx = event_tx.clone();
        let state_peer = peer.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let peer = state_peer.clone();

                Box::pin(async move {
                    info!("Peer connection state for {} changed to {:?}", peer, s);
                    let state = match s {
                        RTCPeerConnectionState::Connecting => PeerConnectionState::Connecting,
                        RTCPeerConnectionState::Connected => PeerConnectionState::Connected,
                        RTCPeerConnectionState::Disconnected => PeerConnectionState::Disconnected,
                        RTCPeerConnectionState::Failed => PeerConnectionState::Failed,
                        RTCPeerConnectionState::Closed => PeerConnectionState::Closed,
                        _ => PeerConnectionState::New,
                    };
                    let _ = tx
                        .send(TransportEvent::StateChanged {
                            peer,
                            generation,
                            state,
                        })
                        .await;
                })
            },
        ));

        let ice_tx = event_tx;
        let ice_peer = peer.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let peer = ice_peer.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                debug!("Local ICE candidate for {}: {}", peer, init.candidate);
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated {
                        peer,
                        generation,
                        candidate,
                    })
                    .await;
            })
        }));

        Ok(Self {
            peer,
            peer_connection,
        })
    }

    pub async fn offer(&self) -> Result<String> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    pub async fn answer(&self) -> Result<String> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(answer.sdp)
    }

    pub async fn apply_remote(&self, desc: SessionDescription) -> Result<()> {
        let desc = match desc.kind {
            SdpKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
            SdpKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
        };
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    pub async fn add_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            ..Default::default()
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }
}

fn peer_error(e: anyhow::Error) -> CallError {
    CallError::PeerConnection(format!("{e:#}"))
}

#[async_trait]
impl PeerTransport for WebRtcTransport {
    async fn create_offer(&self) -> Result<SessionDescription, CallError> {
        self.offer()
            .await
            .map(SessionDescription::offer)
            .map_err(peer_error)
    }

    async fn create_answer(&self) -> Result<SessionDescription, CallError> {
        self.answer()
            .await
            .map(SessionDescription::answer)
            .map_err(peer_error)
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), CallError> {
        self.apply_remote(desc).await.map_err(peer_error)
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), CallError> {
        self.add_candidate(candidate).await.map_err(peer_error)
    }

    async fn close(&self) -> Result<(), CallError> {
        self.peer_connection
            .close()
            .await
            .map_err(|e| CallError::PeerConnection(e.to_string()))
    }
}
