use crate::model::{RoomCode, Username};
use thiserror::Error;

/// Every failure the call-session layer reports to its caller or the UI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("room allocation failed: {0}")]
    AllocationError(String),

    #[error("invalid room code {0:?}")]
    InvalidCode(String),

    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    #[error("room {0} is full")]
    RoomFull(RoomCode),

    #[error("camera or microphone access denied")]
    MediaAccessDenied,

    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A malformed or out-of-place offer, answer or candidate from `peer`.
    #[error("signaling protocol error with {peer}: {reason}")]
    SignalingProtocolError { peer: Username, reason: String },

    #[error("connection to {0} timed out")]
    ConnectionTimeout(Username),

    #[error("no authenticated identity")]
    Unauthenticated,

    #[error("already in room {0}, leave it first")]
    AlreadyInRoom(RoomCode),

    #[error("not in a room")]
    NotInRoom,

    #[error("relay channel closed")]
    RelayClosed,

    /// Opaque failure reported by the peer-connection capability.
    #[error("peer connection error: {0}")]
    PeerConnection(String),
}

impl CallError {
    pub fn protocol(peer: &Username, reason: impl Into<String>) -> Self {
        Self::SignalingProtocolError {
            peer: peer.clone(),
            reason: reason.into(),
        }
    }
}
