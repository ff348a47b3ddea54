use crate::{AppState, api, ws_handler};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/create-room", post(api::create_room))
        .route("/api/join-room/{code}", post(api::join_room))
        .route("/api/leave-room/{code}", post(api::leave_room))
        .route("/api/room-status/{code}", get(api::room_status))
        .route("/api/active-rooms", get(api::active_rooms))
        .route("/api/ice-servers", get(api::ice_servers))
        .route("/ws/{username}", get(ws_handler))
        .layer(cors)
        .with_state(state)
}
