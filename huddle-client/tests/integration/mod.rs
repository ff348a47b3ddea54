
use huddle_client::SignalingState;
use tracing::Level;

use crate::utils::{MemoryAllocator, TestPeer, pump};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Alice creates room ABCD, Bob joins it, and both links reach `Connected`.
pub async fn connected_pair() -> (MemoryAllocator, TestPeer, TestPeer) {
    let allocator = MemoryAllocator::with_codes(&["ABCD"]);
    let mut alice = TestPeer::new("alice", &allocator);
    let mut bob = TestPeer::new("bob", &allocator);

    alice.session.create_room().await.expect("create room");
    pump(&mut [&mut alice, &mut bob]).await;
    bob.session.join_room("abcd").await.expect("join room");
    pump(&mut [&mut alice, &mut bob]).await;

    assert_eq!(alice.link_state("bob"), Some(SignalingState::Connected));
    assert_eq!(bob.link_state("alice"), Some(SignalingState::Connected));

    alice.ui_events();
    bob.ui_events();
    (allocator, alice, bob)
}
