use crate::chat::ChatMessage;
use crate::room::ConnectionStatus;
use huddle_core::{CallError, MediaState, RoomCode, Username};

/// State changes the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    RoomEntered {
        room_code: RoomCode,
        participants: Vec<Username>,
    },
    RoomLeft {
        room_code: RoomCode,
    },
    ParticipantJoined(Username),
    ParticipantLeft(Username),
    ParticipantStatus {
        username: Username,
        status: ConnectionStatus,
    },
    RemoteMediaState {
        username: Username,
        media: MediaState,
    },
    LocalMediaState(MediaState),
    ChatMessage(ChatMessage),
    Error(CallError),
}
