use axum::extract::ws::Message;
use huddle_core::{RoomCode, Username};
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One relay WebSocket and the room it is subscribed to.
pub struct Connection {
    pub username: Username,
    pub room: Option<RoomCode>,
    pub tx: mpsc::UnboundedSender<Message>,
}
