use huddle_core::model::api::ErrorResponse;
use reqwest::StatusCode;

use crate::integration::init_tracing;
use crate::utils::{ApiClient, TestServer};

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    init_tracing();

    let server = TestServer::spawn(Default::default()).await;
    let api = ApiClient::new(&server);

    let response = api.post("/api/create-room", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json().await.unwrap();
    assert!(!body.error.is_empty());

    let response = api.post("/api/create-room", Some("   ")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = api.get("/api/active-rooms", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.state.registry.active_rooms().total_rooms, 0);
}

#[tokio::test]
async fn test_join_errors() {
    init_tracing();

    let server = TestServer::with_capacity(2).await;
    let api = ApiClient::new(&server);

    assert_eq!(api.join_room("NOPE42", "bob").await, StatusCode::NOT_FOUND);
    assert_eq!(api.join_room("no_pe", "bob").await, StatusCode::BAD_REQUEST);

    let code = api.create_room("alice").await;
    assert_eq!(api.join_room(code.as_str(), "bob").await, StatusCode::OK);
    assert_eq!(api.join_room(code.as_str(), "carol").await, StatusCode::CONFLICT);

    // Rejoining is not an error even when the room is full.
    assert_eq!(api.join_room(code.as_str(), "bob").await, StatusCode::OK);

    let response = api.post("/api/leave-room/NOPE42", Some("bob")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
