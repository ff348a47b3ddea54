use huddle_core::model::api::{
    ActiveRoomsResponse, JoinRoomResponse, MessageResponse, RoomStatusResponse,
};
use huddle_core::{IceServerConfig, Username};
use reqwest::StatusCode;

use crate::integration::init_tracing;
use crate::utils::{ApiClient, TestServer};

#[tokio::test]
async fn test_room_lifecycle() {
    init_tracing();

    let server = TestServer::spawn(Default::default()).await;
    let api = ApiClient::new(&server);

    let code = api.create_room("alice").await;
    assert_eq!(code.as_str().len(), 6);

    // Codes are case-insensitive on the way in.
    let response = api
        .post(
            &format!("/api/join-room/{}", code.as_str().to_lowercase()),
            Some("bob"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let joined: JoinRoomResponse = response.json().await.unwrap();
    assert_eq!(joined.room_code, code);
    assert_eq!(
        joined.participants,
        vec![Username::from("alice"), Username::from("bob")]
    );

    let status: RoomStatusResponse = api
        .get(&format!("/api/room-status/{}", code), Some("carol"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(status.participant_count, 2);

    let active: ActiveRoomsResponse = api
        .get("/api/active-rooms", Some("carol"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(active.active_rooms, vec![code.clone()]);
    assert_eq!(active.total_rooms, 1);

    let response = api
        .post(&format!("/api/leave-room/{}", code), Some("alice"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let _: MessageResponse = response.json().await.unwrap();

    let response = api
        .post(&format!("/api/leave-room/{}", code), Some("bob"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The last leave removes the room.
    let response = api
        .get(&format!("/api/room-status/{}", code), Some("carol"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!server.state.registry.contains(&code));
}

#[tokio::test]
async fn test_ice_servers() {
    init_tracing();

    let server = TestServer::spawn(Default::default()).await;
    let api = ApiClient::new(&server);

    let response = api.get("/api/ice-servers", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let servers: Vec<IceServerConfig> = response.json().await.unwrap();
    assert_eq!(servers, IceServerConfig::default_stun());
}
