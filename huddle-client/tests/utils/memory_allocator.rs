use async_trait::async_trait;
use huddle_client::RoomAllocator;
use huddle_core::{CallError, RoomCode, Username};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

struct AllocatorState {
    rooms: HashMap<RoomCode, Vec<Username>>,
    next_codes: VecDeque<RoomCode>,
    capacity: usize,
    calls: usize,
    fail_leave: bool,
}

/// In-memory RoomAllocator shared by every test peer, standing in for the HTTP API.
#[derive(Clone)]
pub struct MemoryAllocator {
    inner: Arc<Mutex<AllocatorState>>,
}

impl MemoryAllocator {
    pub fn new() -> Self {
        Self::with_codes(&[])
    }

    /// Codes handed out by `create_room`, in order, before falling back to random ones.
    pub fn with_codes(codes: &[&str]) -> Self {
        let next_codes = codes
            .iter()
            .map(|c| RoomCode::new(c).expect("valid test room code"))
            .collect();

        Self {
            inner: Arc::new(Mutex::new(AllocatorState {
                rooms: HashMap::new(),
                next_codes,
                capacity: 8,
                calls: 0,
                fail_leave: false,
            })),
        }
    }

    pub async fn set_capacity(&self, capacity: usize) {
        self.inner.lock().await.capacity = capacity;
    }

    pub async fn set_fail_leave(&self, fail: bool) {
        self.inner.lock().await.fail_leave = fail;
    }

    pub async fn calls(&self) -> usize {
        self.inner.lock().await.calls
    }

    pub async fn members(&self, code: &str) -> Option<Vec<Username>> {
        let code = RoomCode::new(code).ok()?;
        self.inner.lock().await.rooms.get(&code).cloned()
    }
}

impl Default for MemoryAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomAllocator for MemoryAllocator {
    async fn create_room(&self, creator: &Username) -> Result<RoomCode, CallError> {
        let mut state = self.inner.lock().await;
        state.calls += 1;

        let code = state.next_codes.pop_front().unwrap_or_else(RoomCode::generate);
        state.rooms.insert(code.clone(), vec![creator.clone()]);
        Ok(code)
    }

    async fn join_room(
        &self,
        code: &RoomCode,
        username: &Username,
    ) -> Result<Vec<Username>, CallError> {
        let mut state = self.inner.lock().await;
        state.calls += 1;
        let capacity = state.capacity;

        let members = state
            .rooms
            .get_mut(code)
            .ok_or_else(|| CallError::RoomNotFound(code.clone()))?;
        if members.contains(username) {
            return Ok(members.clone());
        }
        if members.len() >= capacity {
            return Err(CallError::RoomFull(code.clone()));
        }
        members.push(username.clone());
        Ok(members.clone())
    }

    async fn leave_room(&self, code: &RoomCode, username: &Username) -> Result<(), CallError> {
        let mut state = self.inner.lock().await;
        state.calls += 1;
        if state.fail_leave {
            return Err(CallError::AllocationError("server unreachable".into()));
        }

        let Some(members) = state.rooms.get_mut(code) else {
            return Err(CallError::RoomNotFound(code.clone()));
        };
        members.retain(|m| m != username);
        if members.is_empty() {
            state.rooms.remove(code);
        }
        Ok(())
    }
}
