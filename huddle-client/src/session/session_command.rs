use crate::chat::ChatMessage;
use crate::room::Participant;
use huddle_core::{CallError, MediaState, RoomCode};
use tokio::sync::{mpsc, oneshot};

type Reply<T> = oneshot::Sender<Result<T, CallError>>;

/// Requests from the presentation layer to a running [`CallSession`](crate::CallSession).
#[derive(Debug)]
pub enum SessionCommand {
    CreateRoom { reply: Reply<RoomCode> },
    JoinRoom { code: String, reply: Reply<RoomCode> },
    LeaveRoom { reply: Reply<()> },
    SetAudio { enabled: bool, reply: Reply<MediaState> },
    SetVideo { enabled: bool, reply: Reply<MediaState> },
    SendChat { text: String, reply: Reply<()> },
    Participants { reply: oneshot::Sender<Vec<Participant>> },
    ChatLog { reply: oneshot::Sender<Vec<ChatMessage>> },
    /// Leaves any room, releases media and stops the session loop.
    Logout,
}

/// Cloneable front end to a spawned session loop.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn new(tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { tx }
    }

    pub async fn create_room(&self) -> Result<RoomCode, CallError> {
        self.request(|reply| SessionCommand::CreateRoom { reply })
            .await
    }

    pub async fn join_room(&self, code: impl Into<String>) -> Result<RoomCode, CallError> {
        let code = code.into();
        self.request(|reply| SessionCommand::JoinRoom { code, reply })
            .await
    }

    pub async fn leave_room(&self) -> Result<(), CallError> {
        self.request(|reply| SessionCommand::LeaveRoom { reply })
            .await
    }

    pub async fn set_audio_enabled(&self, enabled: bool) -> Result<MediaState, CallError> {
        self.request(|reply| SessionCommand::SetAudio { enabled, reply })
            .await
    }

    pub async fn set_video_enabled(&self, enabled: bool) -> Result<MediaState, CallError> {
        self.request(|reply| SessionCommand::SetVideo { enabled, reply })
            .await
    }

    pub async fn send_chat(&self, text: impl Into<String>) -> Result<(), CallError> {
        let text = text.into();
        self.request(|reply| SessionCommand::SendChat { text, reply })
            .await
    }

    pub async fn participants(&self) -> Vec<Participant> {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(SessionCommand::Participants { reply })
            .await
            .is_err()
        {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    pub async fn chat_log(&self) -> Vec<ChatMessage> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(SessionCommand::ChatLog { reply }).await.is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    pub async fn logout(&self) {
        let _ = self.tx.send(SessionCommand::Logout).await;
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, CallError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| CallError::RelayClosed)?;
        rx.await.map_err(|_| CallError::RelayClosed)?
    }
}
