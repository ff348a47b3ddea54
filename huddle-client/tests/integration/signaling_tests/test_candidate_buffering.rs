use huddle_client::{SessionConfig, SignalingState};
use huddle_core::Username;

use crate::integration::init_tracing;
use crate::utils::{
    FakeDevices, MemoryAllocator, TestPeer, TransportOp, candidate_event, pump, take_named,
};

/// Alice has created ABCD and Bob has joined; Alice has been told and has
/// published her offer, but nothing else has been delivered.
async fn offer_pending(bob_config: SessionConfig) -> (TestPeer, TestPeer) {
    let allocator = MemoryAllocator::with_codes(&["ABCD"]);
    let mut alice = TestPeer::new("alice", &allocator);
    let mut bob = TestPeer::with("bob", &allocator, FakeDevices::granting(), bob_config);

    alice.session.create_room().await.unwrap();
    pump(&mut [&mut alice, &mut bob]).await;
    bob.session.join_room("ABCD").await.unwrap();

    for event in bob.take_outbox() {
        alice.deliver(event).await;
    }
    assert_eq!(alice.link_state("bob"), Some(SignalingState::OfferSent));
    (alice, bob)
}

#[tokio::test]
async fn test_early_candidates_flushed_once_in_order() {
    init_tracing();

    let (mut alice, mut bob) = offer_pending(SessionConfig::default()).await;
    let mut alice_out = alice.take_outbox();
    let offer = take_named(&mut alice_out, "offer");

    // Candidates overtake the offer
    for line in ["c1", "c2", "c3"] {
        bob.deliver(candidate_event("ABCD", "alice", "bob", line)).await;
    }
    assert_eq!(bob.link_state("alice"), Some(SignalingState::Idle));
    assert!(bob.connector.candidates_for("alice").await.is_empty());

    for event in offer {
        bob.deliver(event).await;
    }
    assert_eq!(bob.link_state("alice"), Some(SignalingState::AnswerSent));
    assert_eq!(bob.connector.candidates_for("alice").await, vec!["c1", "c2", "c3"]);

    // Remote description first, then the flushed candidates
    let ops = bob.connector.ops_for("alice").await;
    let remote_at = ops
        .iter()
        .position(|op| matches!(op, TransportOp::RemoteDescription { .. }))
        .unwrap();
    let first_candidate_at = ops
        .iter()
        .position(|op| matches!(op, TransportOp::Candidate { .. }))
        .unwrap();
    assert!(remote_at < first_candidate_at);

    // Later candidates are applied directly, nothing is replayed
    bob.deliver(candidate_event("ABCD", "alice", "bob", "c4")).await;
    assert_eq!(
        bob.connector.candidates_for("alice").await,
        vec!["c1", "c2", "c3", "c4"]
    );
    assert_eq!(
        bob.session
            .signaling()
            .and_then(|s| s.link(&Username::from("alice")))
            .map(|l| l.pending_len()),
        Some(0)
    );
}

#[tokio::test]
async fn test_candidates_before_answer_are_buffered() {
    init_tracing();

    let (mut alice, mut bob) = offer_pending(SessionConfig::default()).await;
    let mut alice_out = alice.take_outbox();
    for event in take_named(&mut alice_out, "offer") {
        bob.deliver(event).await;
    }

    let mut bob_out = bob.take_outbox();
    let answer = take_named(&mut bob_out, "answer");
    assert_eq!(answer.len(), 1);

    alice.deliver(candidate_event("ABCD", "bob", "alice", "b1")).await;
    alice.deliver(candidate_event("ABCD", "bob", "alice", "b2")).await;
    assert!(alice.connector.candidates_for("bob").await.is_empty());

    for event in answer {
        alice.deliver(event).await;
    }

    assert_eq!(alice.link_state("bob"), Some(SignalingState::AnswerReceived));
    assert_eq!(alice.connector.candidates_for("bob").await, vec!["b1", "b2"]);

    pump(&mut [&mut alice, &mut bob]).await;
    assert_eq!(alice.link_state("bob"), Some(SignalingState::Connected));
    assert_eq!(bob.link_state("alice"), Some(SignalingState::Connected));
}

#[tokio::test]
async fn test_candidate_buffer_drops_oldest_beyond_cap() {
    init_tracing();

    let config = SessionConfig {
        candidate_buffer_cap: 2,
        ..SessionConfig::default()
    };
    let (mut alice, mut bob) = offer_pending(config).await;
    let mut alice_out = alice.take_outbox();
    let offer = take_named(&mut alice_out, "offer");

    for line in ["c1", "c2", "c3"] {
        bob.deliver(candidate_event("ABCD", "alice", "bob", line)).await;
    }
    for event in offer {
        bob.deliver(event).await;
    }

    assert_eq!(bob.connector.candidates_for("alice").await, vec!["c2", "c3"]);
}

#[tokio::test]
async fn test_candidates_for_someone_else_are_ignored() {
    init_tracing();

    let (_alice, mut bob) = offer_pending(SessionConfig::default()).await;

    bob.deliver(candidate_event("ABCD", "alice", "carol", "c1")).await;
    bob.deliver(candidate_event("ZZZZ", "alice", "bob", "c2")).await;

    assert_eq!(bob.link_state("alice"), None);
}
