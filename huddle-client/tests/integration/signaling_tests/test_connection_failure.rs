use huddle_client::{ConnectionStatus, PeerConnectionState, SignalingState, UiEvent};
use huddle_core::Username;

use crate::integration::{connected_pair, init_tracing};
use crate::utils::{TransportOp, offer_event, sdp};

fn went_disconnected(events: &[UiEvent], peer: &str) -> bool {
    events.iter().any(|e| {
        matches!(
            e,
            UiEvent::ParticipantStatus { username, status: ConnectionStatus::Disconnected }
                if username.as_str() == peer
        )
    })
}

#[tokio::test]
async fn test_failed_connection_closes_link_without_renegotiating() {
    init_tracing();

    let (_allocator, mut alice, _bob) = connected_pair().await;
    let offers = alice.relay.count_named("offer").await;
    let opened = alice
        .connector
        .count(|op| matches!(op, TransportOp::Opened { .. }))
        .await;

    alice
        .connector
        .report_state("bob", PeerConnectionState::Failed)
        .await;
    assert_eq!(alice.session.drain_transport_events().await, 1);

    assert_eq!(alice.link_state("bob"), Some(SignalingState::Closed));
    assert!(went_disconnected(&alice.ui_events(), "bob"));
    assert_eq!(alice.relay.count_named("offer").await, offers);
    assert_eq!(
        alice
            .connector
            .count(|op| matches!(op, TransportOp::Opened { .. }))
            .await,
        opened
    );
    assert!(
        alice
            .connector
            .ops_for("bob")
            .await
            .contains(&TransportOp::Closed {
                peer: Username::from("bob"),
                generation: 1
            })
    );
}

#[tokio::test]
async fn test_disconnect_of_replaced_link_is_ignored() {
    init_tracing();

    let (_allocator, mut alice, _bob) = connected_pair().await;

    alice
        .deliver(offer_event("ABCD", "bob", "alice", sdp("offer", "v=0 restart")))
        .await;
    assert_eq!(alice.link_state("bob"), Some(SignalingState::AnswerSent));

    alice
        .connector
        .report_state_for("bob", 1, PeerConnectionState::Failed)
        .await;
    alice.session.drain_transport_events().await;

    assert_eq!(alice.link_state("bob"), Some(SignalingState::Connected));
    assert!(!went_disconnected(&alice.ui_events(), "bob"));
    let link = alice
        .session
        .signaling()
        .and_then(|s| s.link(&Username::from("bob")))
        .unwrap();
    assert_eq!(link.generation(), 2);
}
