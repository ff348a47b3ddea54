use crate::model::{CandidateBlob, MediaState, RoomCode, SdpBlob, Username};
use serde::{Deserialize, Serialize};

/// Room-scoped events carried by the relay, in both directions.
///
/// Encoded as `{"event": "<name>", "data": {...}}`. Signaling events may name
/// a `target`; everyone else in the room ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RelayEvent {
    Join {
        room_code: RoomCode,
        username: Username,
    },
    Leave {
        room_code: RoomCode,
        username: Username,
    },
    Offer {
        room_code: RoomCode,
        sender: Username,
        #[serde(default)]
        offer: SdpBlob,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<Username>,
        /// Incarnation of the sender's link the event belongs to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generation: Option<u64>,
    },
    Answer {
        room_code: RoomCode,
        sender: Username,
        #[serde(default)]
        answer: SdpBlob,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<Username>,
        /// Incarnation of the sender's link the event belongs to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generation: Option<u64>,
    },
    IceCandidate {
        room_code: RoomCode,
        sender: Username,
        #[serde(default)]
        candidate: CandidateBlob,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<Username>,
        /// Incarnation of the sender's link the event belongs to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generation: Option<u64>,
    },
    MediaState {
        room_code: RoomCode,
        username: Username,
        audio_enabled: bool,
        video_enabled: bool,
    },
    Chat {
        room_code: RoomCode,
        username: Username,
        text: String,
        timestamp: u64,
    },
}

impl RelayEvent {
    pub fn media_state(room_code: RoomCode, username: Username, state: MediaState) -> Self {
        Self::MediaState {
            room_code,
            username,
            audio_enabled: state.audio_enabled,
            video_enabled: state.video_enabled,
        }
    }

    pub fn room_code(&self) -> &RoomCode {
        match self {
            Self::Join { room_code, .. }
            | Self::Leave { room_code, .. }
            | Self::Offer { room_code, .. }
            | Self::Answer { room_code, .. }
            | Self::IceCandidate { room_code, .. }
            | Self::MediaState { room_code, .. }
            | Self::Chat { room_code, .. } => room_code,
        }
    }

    /// The participant that produced the event.
    pub fn origin(&self) -> &Username {
        match self {
            Self::Join { username, .. }
            | Self::Leave { username, .. }
            | Self::MediaState { username, .. }
            | Self::Chat { username, .. } => username,
            Self::Offer { sender, .. }
            | Self::Answer { sender, .. }
            | Self::IceCandidate { sender, .. } => sender,
        }
    }

    pub fn target(&self) -> Option<&Username> {
        match self {
            Self::Offer { target, .. }
            | Self::Answer { target, .. }
            | Self::IceCandidate { target, .. } => target.as_ref(),
            _ => None,
        }
    }

    /// The sender's link generation, for signaling events that carry one.
    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::Offer { generation, .. }
            | Self::Answer { generation, .. }
            | Self::IceCandidate { generation, .. } => *generation,
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice_candidate",
            Self::MediaState { .. } => "media_state",
            Self::Chat { .. } => "chat",
        }
    }

    /// Chat is echoed back to its sender; every other event goes to the other members only.
    pub fn echoes_to_sender(&self) -> bool {
        matches!(self, Self::Chat { .. })
    }
}
