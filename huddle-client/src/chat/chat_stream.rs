use crate::chat::ChatMessage;
use crate::session::{SessionContext, UiEvent};
use huddle_core::{CallError, RelayEvent, RoomCode};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use uuid::Uuid;

/// Chat for the active room, kept in relay receipt order.
///
/// The relay echoes chat back to its sender, so own messages enter the log
/// when they come back rather than when they are sent.
pub struct ChatStream {
    ctx: SessionContext,
    room: Option<RoomCode>,
    log: Vec<ChatMessage>,
}

impl ChatStream {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            room: None,
            log: Vec::new(),
        }
    }

    pub fn attach(&mut self, room: RoomCode) {
        self.room = Some(room);
        self.log.clear();
    }

    pub fn detach(&mut self) {
        self.room = None;
        self.log.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.log
    }

    /// Publishes `text` to the room. Blank text or no active room is a no-op.
    pub async fn send(&self, text: &str) -> Result<(), CallError> {
        let text = text.trim();
        let Some(room) = &self.room else {
            debug!("Chat message dropped: no active room");
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }

        self.ctx
            .publish(RelayEvent::Chat {
                room_code: room.clone(),
                username: self.ctx.username().clone(),
                text: text.to_owned(),
                timestamp: now_millis(),
            })
            .await
    }

    /// Appends a relayed chat event to the log. Other events and other rooms are ignored.
    pub fn on_message_received(&mut self, event: RelayEvent) -> Option<&ChatMessage> {
        let RelayEvent::Chat {
            room_code,
            username,
            text,
            timestamp,
        } = event
        else {
            return None;
        };
        if self.room.as_ref() != Some(&room_code) {
            return None;
        }

        let message = ChatMessage {
            id: Uuid::new_v4(),
            room_code,
            sender: username,
            text,
            timestamp,
        };
        self.ctx.emit(UiEvent::ChatMessage(message.clone()));
        self.log.push(message);
        self.log.last()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
