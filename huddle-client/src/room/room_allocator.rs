use async_trait::async_trait;
use huddle_core::{CallError, RoomCode, Username};

/// Server-side collaborator that issues room codes and tracks membership.
#[async_trait]
pub trait RoomAllocator: Send + Sync {
    /// Allocates a fresh room with `creator` as its only member.
    async fn create_room(&self, creator: &Username) -> Result<RoomCode, CallError>;

    /// Adds `username` to `code` and returns the full member list, joiner included.
    async fn join_room(&self, code: &RoomCode, username: &Username)
    -> Result<Vec<Username>, CallError>;

    async fn leave_room(&self, code: &RoomCode, username: &Username) -> Result<(), CallError>;
}
