use crate::AppState;
use crate::api::{ApiError, Identity};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use huddle_core::model::api::{
    ActiveRoomsResponse, CreateRoomResponse, JoinRoomResponse, MessageResponse,
    RoomStatusResponse,
};
use huddle_core::{IceServerConfig, RoomCode};
use tracing::info;

pub async fn create_room(
    State(state): State<AppState>,
    Identity(username): Identity,
) -> Result<(StatusCode, Json<CreateRoomResponse>), ApiError> {
    let room_code = state.registry.create_room(&username)?;
    Ok((StatusCode::CREATED, Json(CreateRoomResponse { room_code })))
}

pub async fn join_room(
    State(state): State<AppState>,
    Identity(username): Identity,
    Path(code): Path<String>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let room_code = RoomCode::new(&code)?;
    let participants = state.registry.join_room(&room_code, &username)?;
    Ok(Json(JoinRoomResponse {
        room_code,
        participants,
    }))
}

pub async fn leave_room(
    State(state): State<AppState>,
    Identity(username): Identity,
    Path(code): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let room_code = RoomCode::new(&code)?;
    if state.registry.leave_room(&room_code, &username)? {
        info!("Room {} removed", room_code);
    }
    Ok(Json(MessageResponse::new(format!("left room {}", room_code))))
}

pub async fn room_status(
    State(state): State<AppState>,
    Identity(_): Identity,
    Path(code): Path<String>,
) -> Result<Json<RoomStatusResponse>, ApiError> {
    let room_code = RoomCode::new(&code)?;
    Ok(Json(state.registry.status(&room_code)?))
}

pub async fn active_rooms(
    State(state): State<AppState>,
    Identity(_): Identity,
) -> Json<ActiveRoomsResponse> {
    Json(state.registry.active_rooms())
}

pub async fn ice_servers(State(state): State<AppState>) -> Json<Vec<IceServerConfig>> {
    Json(state.config.ice_servers.clone())
}
