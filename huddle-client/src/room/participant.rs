use crate::signaling::SignalingState;
use huddle_core::{MediaState, Username};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Waiting,
    Connecting,
    Connected,
    Disconnected,
}

impl From<SignalingState> for ConnectionStatus {
    fn from(state: SignalingState) -> Self {
        match state {
            SignalingState::Idle => Self::Waiting,
            SignalingState::OfferSent
            | SignalingState::OfferReceived
            | SignalingState::AnswerSent
            | SignalingState::AnswerReceived => Self::Connecting,
            SignalingState::Connected => Self::Connected,
            SignalingState::Closed => Self::Disconnected,
        }
    }
}

/// A room member as the local session currently sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub username: Username,
    pub media: MediaState,
    pub status: ConnectionStatus,
}

impl Participant {
    pub fn new(username: Username) -> Self {
        Self {
            username,
            media: MediaState::default(),
            status: ConnectionStatus::Waiting,
        }
    }
}
