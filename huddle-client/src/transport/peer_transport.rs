use crate::media::LocalTracks;
use crate::transport::TransportEvent;
use async_trait::async_trait;
use huddle_core::{CallError, IceCandidate, SessionDescription, Username};
use tokio::sync::mpsc;

/// Factory for peer connections: the opaque capability the coordinator drives.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    /// Opens a connection to `peer` with `tracks` attached.
    ///
    /// Candidates and state changes must be reported on `events`, tagged with
    /// `peer` and `generation`.
    async fn open(
        &self,
        peer: &Username,
        generation: u64,
        tracks: &LocalTracks,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>, CallError>;
}

/// One peer connection.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Creates an offer and installs it as the local description.
    async fn create_offer(&self) -> Result<SessionDescription, CallError>;

    /// Creates an answer to the applied remote offer and installs it locally.
    async fn create_answer(&self) -> Result<SessionDescription, CallError>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), CallError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), CallError>;

    async fn close(&self) -> Result<(), CallError>;
}
