use crate::room::RoomEntry;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use huddle_core::model::api::{ActiveRoomsResponse, RoomStatusResponse};
use huddle_core::{CallError, RoomCode, Username};
use std::sync::Arc;
use tracing::{info, warn};

const CODE_ATTEMPTS: usize = 32;

/// Every room the server has allocated, keyed by code.
///
/// A room lives from `create_room` until its last participant leaves.
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomCode, RoomEntry>>,
    max_participants: usize,
}

impl RoomRegistry {
    pub fn new(max_participants: usize) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            max_participants,
        }
    }

    pub fn max_participants(&self) -> usize {
        self.max_participants
    }

    /// Allocates a fresh code with `creator` as the only member.
    pub fn create_room(&self, creator: &Username) -> Result<RoomCode, CallError> {
        for _ in 0..CODE_ATTEMPTS {
            let code = RoomCode::generate();
            match self.rooms.entry(code.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(RoomEntry::new(creator.clone()));
                    info!("Room {} created by {}", code, creator);
                    return Ok(code);
                }
            }
        }

        warn!("No free room code after {} attempts", CODE_ATTEMPTS);
        Err(CallError::AllocationError(
            "could not allocate a unique room code".to_owned(),
        ))
    }

    /// Adds `username` and returns the member list. Joining twice is a no-op.
    pub fn join_room(
        &self,
        code: &RoomCode,
        username: &Username,
    ) -> Result<Vec<Username>, CallError> {
        let mut room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| CallError::RoomNotFound(code.clone()))?;

        if room.contains(username) {
            return Ok(room.participants.clone());
        }
        if room.participants.len() >= self.max_participants {
            return Err(CallError::RoomFull(code.clone()));
        }

        room.participants.push(username.clone());
        info!(
            "{} joined room {} ({} members)",
            username,
            code,
            room.participants.len()
        );
        Ok(room.participants.clone())
    }

    /// Removes `username`; returns whether the room was deleted as a result.
    pub fn leave_room(&self, code: &RoomCode, username: &Username) -> Result<bool, CallError> {
        {
            let mut room = self
                .rooms
                .get_mut(code)
                .ok_or_else(|| CallError::RoomNotFound(code.clone()))?;
            room.participants.retain(|p| p != username);
        }

        let removed = self
            .rooms
            .remove_if(code, |_, room| room.participants.is_empty())
            .is_some();
        if removed {
            info!("Room {} closed, last participant {} left", code, username);
        }
        Ok(removed)
    }

    pub fn status(&self, code: &RoomCode) -> Result<RoomStatusResponse, CallError> {
        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| CallError::RoomNotFound(code.clone()))?;

        Ok(RoomStatusResponse {
            room_code: code.clone(),
            participants: room.participants.clone(),
            participant_count: room.participants.len(),
        })
    }

    pub fn active_rooms(&self) -> ActiveRoomsResponse {
        let mut active_rooms: Vec<RoomCode> = self.rooms.iter().map(|r| r.key().clone()).collect();
        active_rooms.sort();

        ActiveRoomsResponse {
            total_rooms: active_rooms.len(),
            active_rooms,
        }
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn is_member(&self, code: &RoomCode, username: &Username) -> bool {
        self.rooms
            .get(code)
            .is_some_and(|room| room.contains(username))
    }
}
