use huddle_core::{RelayEvent, SdpBlob, Username};

use crate::integration::init_tracing;
use crate::utils::{ApiClient, TestServer, WsClient, wait_until};

#[tokio::test]
async fn test_relay_routing() {
    init_tracing();

    let server = TestServer::spawn(Default::default()).await;
    let api = ApiClient::new(&server);
    let code = api.create_room("alice").await;
    assert_eq!(api.join_room(code.as_str(), "bob").await, reqwest::StatusCode::OK);

    let mut alice = WsClient::connect(&server, "alice").await;
    let mut bob = WsClient::connect(&server, "bob").await;

    alice.join(&code).await;
    let hub = server.state.hub.clone();
    let joined = code.clone();
    assert!(wait_until(2000, || hub.subscribers(&joined) == 1).await);

    bob.join(&code).await;
    let event = alice.recv(2000).await.expect("alice sees bob join");
    assert_eq!(
        event,
        RelayEvent::Join {
            room_code: code.clone(),
            username: Username::from("bob"),
        }
    );

    let offer = RelayEvent::Offer {
        room_code: code.clone(),
        sender: Username::from("alice"),
        offer: SdpBlob {
            kind: Some("offer".to_owned()),
            sdp: Some("v=0".to_owned()),
        },
        target: Some(Username::from("bob")),
        generation: None,
    };
    alice.send(&offer).await;
    assert_eq!(bob.recv(2000).await, Some(offer));

    let chat = RelayEvent::Chat {
        room_code: code.clone(),
        username: Username::from("bob"),
        text: "hello".to_owned(),
        timestamp: 42,
    };
    bob.send(&chat).await;
    assert_eq!(alice.recv(2000).await, Some(chat.clone()));
    assert_eq!(bob.recv(2000).await, Some(chat));

    // Offers are not echoed, and a spoofed sender goes nowhere.
    assert_eq!(alice.recv(200).await, None);
    let spoofed = RelayEvent::MediaState {
        room_code: code.clone(),
        username: Username::from("alice"),
        audio_enabled: false,
        video_enabled: true,
    };
    bob.send(&spoofed).await;
    assert_eq!(alice.recv(200).await, None);

    alice.close().await;
    bob.close().await;
}

#[tokio::test]
async fn test_join_unknown_room_is_ignored() {
    init_tracing();

    let server = TestServer::spawn(Default::default()).await;
    let api = ApiClient::new(&server);
    let code = api.create_room("alice").await;

    let mut alice = WsClient::connect(&server, "alice").await;
    let mut mallory = WsClient::connect(&server, "mallory").await;
    alice.join(&code).await;
    let hub = server.state.hub.clone();
    let joined = code.clone();
    assert!(wait_until(2000, || hub.subscribers(&joined) == 1).await);

    let unknown = huddle_core::RoomCode::new("ZZZZ99").unwrap();
    mallory.join(&unknown).await;
    mallory.send_raw("definitely not json").await;
    mallory
        .send(&RelayEvent::Chat {
            room_code: code.clone(),
            username: Username::from("mallory"),
            text: "let me in".to_owned(),
            timestamp: 1,
        })
        .await;

    assert_eq!(alice.recv(300).await, None);
    assert_eq!(mallory.recv(100).await, None);
    assert_eq!(server.state.hub.subscribers(&unknown), 0);
}

#[tokio::test]
async fn test_join_without_registry_membership_is_ignored() {
    init_tracing();

    let server = TestServer::spawn(Default::default()).await;
    let api = ApiClient::new(&server);
    let code = api.create_room("alice").await;

    let mut alice = WsClient::connect(&server, "alice").await;
    let mut carol = WsClient::connect(&server, "carol").await;
    alice.join(&code).await;
    let hub = server.state.hub.clone();
    let joined = code.clone();
    assert!(wait_until(2000, || hub.subscribers(&joined) == 1).await);

    carol.join(&code).await;
    carol
        .send(&RelayEvent::Chat {
            room_code: code.clone(),
            username: Username::from("carol"),
            text: "skipped the front door".to_owned(),
            timestamp: 1,
        })
        .await;

    assert_eq!(alice.recv(300).await, None);
    assert_eq!(carol.recv(100).await, None);
    assert_eq!(server.state.hub.subscribers(&code), 1);
}
