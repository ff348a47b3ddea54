use huddle_core::{RoomCode, Username};
use uuid::Uuid;

/// One chat line as received from the relay. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Assigned locally on receipt, for the UI to key on.
    pub id: Uuid,
    pub room_code: RoomCode,
    pub sender: Username,
    pub text: String,
    /// Sender's clock, milliseconds since the Unix epoch.
    pub timestamp: u64,
}
