use crate::relay::{Connection, ConnectionId};
use crate::room::RoomRegistry;
use axum::extract::ws::Message;
use dashmap::DashMap;
use huddle_core::{RelayEvent, RoomCode, Username};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

struct RelayInner {
    connections: DashMap<ConnectionId, Connection>,
    rooms: DashMap<RoomCode, HashSet<ConnectionId>>,
    registry: RoomRegistry,
}

/// Room-scoped fan-out of relay events between WebSocket connections.
///
/// A connection is subscribed to at most one room, by sending `join` for a
/// room the registry lists it as a member of. Chat goes to every subscriber, everything else
/// to the other subscribers only.
#[derive(Clone)]
pub struct RelayHub {
    inner: Arc<RelayInner>,
}

impl RelayHub {
    pub fn new(registry: RoomRegistry) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                connections: DashMap::new(),
                rooms: DashMap::new(),
                registry,
            }),
        }
    }

    pub fn connect(&self, username: Username, tx: mpsc::UnboundedSender<Message>) -> ConnectionId {
        let id = ConnectionId::new();
        info!("Relay connection {} opened for {}", id, username);
        self.inner.connections.insert(
            id,
            Connection {
                username,
                room: None,
                tx,
            },
        );
        id
    }

    /// Forgets the connection. A subscribed connection leaves its room, both
    /// on the relay and in the registry.
    pub fn disconnect(&self, id: ConnectionId) {
        let Some((_, connection)) = self.inner.connections.remove(&id) else {
            return;
        };
        info!("Relay connection {} closed for {}", id, connection.username);

        let Some(code) = connection.room else {
            return;
        };
        self.unsubscribe(&code, id);
        self.broadcast(
            &RelayEvent::Leave {
                room_code: code.clone(),
                username: connection.username.clone(),
            },
            Some(id),
        );

        if let Err(e) = self.inner.registry.leave_room(&code, &connection.username) {
            debug!("Registry leave on disconnect of {}: {}", connection.username, e);
        }
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn subscribers(&self, code: &RoomCode) -> usize {
        self.inner.rooms.get(code).map_or(0, |room| room.len())
    }

    pub fn handle_text(&self, id: ConnectionId, text: &str) {
        match serde_json::from_str::<RelayEvent>(text) {
            Ok(event) => self.handle_event(id, event),
            Err(e) => warn!("Invalid relay event from {}: {:?}", id, e),
        }
    }

    pub fn handle_event(&self, id: ConnectionId, event: RelayEvent) {
        let Some((username, current)) = self
            .inner
            .connections
            .get(&id)
            .map(|c| (c.username.clone(), c.room.clone()))
        else {
            warn!("Relay event from unknown connection {}", id);
            return;
        };

        if event.origin() != &username {
            warn!(
                "Dropping {} from {}: claims to be {}",
                event.name(),
                username,
                event.origin()
            );
            return;
        }

        let code = event.room_code().clone();
        match &event {
            RelayEvent::Join { .. } => {
                if !self.inner.registry.contains(&code) {
                    warn!("{} tried to join unknown room {}", username, code);
                    return;
                }
                if !self.inner.registry.is_member(&code, &username) {
                    warn!("{} tried to join room {} without joining it first", username, code);
                    return;
                }
                if let Some(previous) = current.filter(|previous| previous != &code) {
                    self.unsubscribe(&previous, id);
                }
                self.subscribe(&code, id);
                info!("{} subscribed to room {}", username, code);
                self.broadcast(&event, Some(id));
            }
            RelayEvent::Leave { .. } => {
                if current.as_ref() != Some(&code) {
                    debug!("{} left room {} it was not subscribed to", username, code);
                    return;
                }
                self.broadcast(&event, Some(id));
                self.unsubscribe(&code, id);
                info!("{} unsubscribed from room {}", username, code);
            }
            _ => {
                if current.as_ref() != Some(&code) {
                    warn!(
                        "Dropping {} from {}: not subscribed to {}",
                        event.name(),
                        username,
                        code
                    );
                    return;
                }
                let skip = (!event.echoes_to_sender()).then_some(id);
                self.broadcast(&event, skip);
            }
        }
    }

    fn subscribe(&self, code: &RoomCode, id: ConnectionId) {
        self.inner.rooms.entry(code.clone()).or_default().insert(id);
        if let Some(mut connection) = self.inner.connections.get_mut(&id) {
            connection.room = Some(code.clone());
        }
    }

    fn unsubscribe(&self, code: &RoomCode, id: ConnectionId) {
        if let Some(mut room) = self.inner.rooms.get_mut(code) {
            room.remove(&id);
        }
        self.inner.rooms.remove_if(code, |_, room| room.is_empty());
        if let Some(mut connection) = self.inner.connections.get_mut(&id) {
            connection.room = None;
        }
    }

    fn broadcast(&self, event: &RelayEvent, skip: Option<ConnectionId>) {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize relay event: {}", e);
                return;
            }
        };

        let recipients: Vec<ConnectionId> = match self.inner.rooms.get(event.room_code()) {
            Some(room) => room.iter().copied().filter(|id| Some(*id) != skip).collect(),
            None => return,
        };

        for id in recipients {
            let Some(connection) = self.inner.connections.get(&id) else {
                continue;
            };
            if connection.tx.send(Message::Text(json.clone().into())).is_err() {
                warn!("Relay send to {} failed", connection.username);
            }
        }
    }
}
