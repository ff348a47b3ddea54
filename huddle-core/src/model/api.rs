//! JSON bodies of the room-allocation HTTP API.

use crate::model::{RoomCode, Username};
use serde::{Deserialize, Serialize};

/// Header carrying the caller's identity on allocation requests.
pub const IDENTITY_HEADER: &str = "x-username";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub room_code: RoomCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    pub room_code: RoomCode,
    pub participants: Vec<Username>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStatusResponse {
    pub room_code: RoomCode,
    pub participants: Vec<Username>,
    pub participant_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRoomsResponse {
    pub active_rooms: Vec<RoomCode>,
    pub total_rooms: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
