use crate::room::{ConnectionStatus, Participant, RoomAllocator};
use crate::session::{SessionContext, UiEvent};
use huddle_core::{CallError, MediaState, RelayEvent, RoomCode, Username};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// The room the local participant is currently in.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    /// Members in join order, the local participant included.
    pub members: Vec<Participant>,
    pub created_at: SystemTime,
}

#[derive(Debug, Clone, Default)]
pub enum RoomState {
    #[default]
    Idle,
    Active(Room),
}

/// Membership and room-code lifecycle: `Idle -> Active -> Idle`.
///
/// Failed create/join calls leave the state untouched. Leaving always ends in
/// `Idle`, whatever the network says.
pub struct RoomSession {
    ctx: SessionContext,
    allocator: Arc<dyn RoomAllocator>,
    state: RoomState,
}

impl RoomSession {
    pub fn new(ctx: SessionContext, allocator: Arc<dyn RoomAllocator>) -> Self {
        Self {
            ctx,
            allocator,
            state: RoomState::Idle,
        }
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, RoomState::Active(_))
    }

    pub fn room(&self) -> Option<&Room> {
        match &self.state {
            RoomState::Active(room) => Some(room),
            RoomState::Idle => None,
        }
    }

    pub fn room_code(&self) -> Option<&RoomCode> {
        self.room().map(|room| &room.code)
    }

    pub fn participants(&self) -> &[Participant] {
        self.room().map(|room| room.members.as_slice()).unwrap_or_default()
    }

    pub fn participant(&self, username: &Username) -> Option<&Participant> {
        self.participants().iter().find(|p| &p.username == username)
    }

    pub fn usernames(&self) -> Vec<Username> {
        self.participants()
            .iter()
            .map(|p| p.username.clone())
            .collect()
    }

    pub async fn create_room(&mut self) -> Result<RoomCode, CallError> {
        self.ensure_idle()?;

        let me = self.ctx.username().clone();
        let code = self
            .allocator
            .create_room(&me)
            .await
            .inspect_err(|e| warn!("Room creation failed: {}", e))?;

        info!("Created room {}", code);
        self.enter(code, vec![me]).await
    }

    /// Joins an existing room. The code is validated before any network call.
    pub async fn join_room(&mut self, code: &str) -> Result<RoomCode, CallError> {
        let code = RoomCode::new(code)?;
        self.ensure_idle()?;

        let me = self.ctx.username().clone();
        let members = self
            .allocator
            .join_room(&code, &me)
            .await
            .inspect_err(|e| warn!("Joining room {} failed: {}", code, e))?;

        info!("Joined room {} with {} members", code, members.len());
        self.enter(code, members).await
    }

    /// Leaves the current room. The state is `Idle` afterwards even when the
    /// allocator or the relay could not be told; the first such failure is returned.
    pub async fn leave_room(&mut self) -> Result<(), CallError> {
        let RoomState::Active(room) = std::mem::take(&mut self.state) else {
            return Err(CallError::NotInRoom);
        };

        let me = self.ctx.username().clone();
        let notified = self.allocator.leave_room(&room.code, &me).await;
        let published = self
            .ctx
            .publish(RelayEvent::Leave {
                room_code: room.code.clone(),
                username: me,
            })
            .await;

        if let Err(e) = &notified {
            warn!("Leave notification for {} failed: {}", room.code, e);
        }
        info!("Left room {}", room.code);
        notified.and(published)
    }

    /// Returns whether `username` was not a member before.
    pub fn on_participant_joined(&mut self, username: &Username) -> bool {
        if username == self.ctx.username() {
            return false;
        }
        let RoomState::Active(room) = &mut self.state else {
            return false;
        };
        if room.members.iter().any(|p| &p.username == username) {
            return false;
        }

        room.members.push(Participant::new(username.clone()));
        info!("{} joined {}", username, room.code);
        self.ctx.emit(UiEvent::ParticipantJoined(username.clone()));
        true
    }

    pub fn on_participant_left(&mut self, username: &Username) -> bool {
        let RoomState::Active(room) = &mut self.state else {
            return false;
        };
        let before = room.members.len();
        room.members.retain(|p| &p.username != username);
        if room.members.len() == before {
            return false;
        }

        info!("{} left {}", username, room.code);
        self.ctx.emit(UiEvent::ParticipantLeft(username.clone()));
        true
    }

    pub fn on_media_state(&mut self, username: &Username, media: MediaState) {
        let Some(participant) = self.member_mut(username) else {
            debug!("Media state for unknown participant {}", username);
            return;
        };
        participant.media = media;
        self.ctx.emit(UiEvent::RemoteMediaState {
            username: username.clone(),
            media,
        });
    }

    pub fn set_status(&mut self, username: &Username, status: ConnectionStatus) {
        let Some(participant) = self.member_mut(username) else {
            return;
        };
        if participant.status == status {
            return;
        }
        participant.status = status;
        self.ctx.emit(UiEvent::ParticipantStatus {
            username: username.clone(),
            status,
        });
    }

    fn member_mut(&mut self, username: &Username) -> Option<&mut Participant> {
        match &mut self.state {
            RoomState::Active(room) => room.members.iter_mut().find(|p| &p.username == username),
            RoomState::Idle => None,
        }
    }

    fn ensure_idle(&self) -> Result<(), CallError> {
        match &self.state {
            RoomState::Active(room) => Err(CallError::AlreadyInRoom(room.code.clone())),
            RoomState::Idle => Ok(()),
        }
    }

    /// Announces the local participant on the relay and activates the room.
    async fn enter(
        &mut self,
        code: RoomCode,
        members: Vec<Username>,
    ) -> Result<RoomCode, CallError> {
        let me = self.ctx.username().clone();
        let join = RelayEvent::Join {
            room_code: code.clone(),
            username: me.clone(),
        };

        if let Err(e) = self.ctx.publish(join).await {
            if let Err(leave_err) = self.allocator.leave_room(&code, &me).await {
                debug!("Rollback of {} failed: {}", code, leave_err);
            }
            return Err(e);
        }

        let mut participants: Vec<Participant> = Vec::with_capacity(members.len() + 1);
        for username in members {
            if participants.iter().any(|p| p.username == username) {
                continue;
            }
            let mut participant = Participant::new(username);
            if participant.username == me {
                participant.status = ConnectionStatus::Connected;
            }
            participants.push(participant);
        }
        if !participants.iter().any(|p| p.username == me) {
            let mut local = Participant::new(me);
            local.status = ConnectionStatus::Connected;
            participants.push(local);
        }

        self.state = RoomState::Active(Room {
            code: code.clone(),
            members: participants,
            created_at: SystemTime::now(),
        });
        Ok(code)
    }
}
