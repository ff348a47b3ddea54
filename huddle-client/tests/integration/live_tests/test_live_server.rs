use huddle_client::{ConnectionStatus, UiEvent};
use huddle_core::{CallError, Username};

use crate::integration::init_tracing;
use crate::utils::{LiveServer, wait_for_ui};

fn connected_to(name: &str) -> impl Fn(&UiEvent) -> bool {
    let name = Username::from(name);
    move |e: &UiEvent| {
        matches!(e, UiEvent::ParticipantStatus { username, status: ConnectionStatus::Connected }
            if username == &name)
    }
}

#[tokio::test]
async fn test_call_through_live_server() {
    init_tracing();

    let server = LiveServer::start().await;
    let (alice, mut alice_ui) = server.spawn_session("alice").await;
    let (bob, mut bob_ui) = server.spawn_session("bob").await;

    let code = alice.create_room().await.expect("create room");
    assert!(server.wait_for_subscribers(&code, 1).await);

    let lowercase = code.as_str().to_lowercase();
    assert_eq!(bob.join_room(lowercase).await, Ok(code.clone()));

    assert!(wait_for_ui(&mut alice_ui, 5000, connected_to("bob")).await.is_some());
    assert!(wait_for_ui(&mut bob_ui, 5000, connected_to("alice")).await.is_some());

    alice.send_chat("over the wire").await.unwrap();
    let received = wait_for_ui(&mut bob_ui, 5000, |e| matches!(e, UiEvent::ChatMessage(_))).await;
    let Some(UiEvent::ChatMessage(message)) = received else {
        panic!("bob did not receive the chat message");
    };
    assert_eq!(message.sender, Username::from("alice"));
    assert_eq!(message.text, "over the wire");

    let media = bob.set_audio_enabled(false).await.unwrap();
    assert!(!media.audio_enabled);
    let remote = wait_for_ui(&mut alice_ui, 5000, |e| {
        matches!(e, UiEvent::RemoteMediaState { username, media }
            if username.as_str() == "bob" && !media.audio_enabled)
    })
    .await;
    assert!(remote.is_some());

    bob.leave_room().await.unwrap();
    let left = wait_for_ui(&mut alice_ui, 5000, |e| {
        matches!(e, UiEvent::ParticipantLeft(name) if name.as_str() == "bob")
    })
    .await;
    assert!(left.is_some());
    assert_eq!(
        server.state.registry.status(&code).unwrap().participants,
        vec![Username::from("alice")]
    );

    alice.logout().await;
    bob.logout().await;
}

#[tokio::test]
async fn test_live_join_errors() {
    init_tracing();

    let server = LiveServer::start().await;
    let (bob, _bob_ui) = server.spawn_session("bob").await;

    assert_eq!(
        bob.join_room("NOPE42").await,
        Err(CallError::RoomNotFound(huddle_core::RoomCode::new("NOPE42").unwrap()))
    );
    assert!(matches!(bob.join_room("").await, Err(CallError::InvalidCode(_))));
    assert!(bob.participants().await.is_empty());
}
