use huddle_core::Username;
use std::time::SystemTime;

/// Server-side record of one allocated room.
#[derive(Debug, Clone)]
pub struct RoomEntry {
    pub creator: Username,
    /// Members in join order.
    pub participants: Vec<Username>,
    pub created_at: SystemTime,
}

impl RoomEntry {
    pub fn new(creator: Username) -> Self {
        Self {
            participants: vec![creator.clone()],
            creator,
            created_at: SystemTime::now(),
        }
    }

    pub fn contains(&self, username: &Username) -> bool {
        self.participants.contains(username)
    }
}
