use crate::room::RoomAllocator;
use async_trait::async_trait;
use huddle_core::model::api::{CreateRoomResponse, ErrorResponse, IDENTITY_HEADER, JoinRoomResponse};
use huddle_core::{CallError, IceServerConfig, RoomCode, Username};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// [`RoomAllocator`] backed by `huddle-server`'s `/api` routes.
#[derive(Clone)]
pub struct HttpRoomAllocator {
    client: Client,
    base_url: String,
}

impl HttpRoomAllocator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// STUN/TURN servers the deployment wants clients to use.
    pub async fn ice_servers(&self) -> Result<Vec<IceServerConfig>, CallError> {
        let response = self
            .client
            .get(format!("{}/api/ice-servers", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse(response, None).await
    }

    async fn post(&self, path: &str, username: &Username) -> Result<Response, CallError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} as {}", url, username);

        self.client
            .post(url)
            .header(IDENTITY_HEADER, username.as_str())
            .send()
            .await
            .map_err(transport_error)
    }

    async fn parse<T: DeserializeOwned>(
        response: Response,
        code: Option<&RoomCode>,
    ) -> Result<T, CallError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(transport_error);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        warn!("Room allocation request failed with {}: {}", status, message);

        Err(match (status, code) {
            (StatusCode::NOT_FOUND, Some(code)) => CallError::RoomNotFound(code.clone()),
            (StatusCode::CONFLICT, Some(code)) => CallError::RoomFull(code.clone()),
            (StatusCode::BAD_REQUEST, Some(code)) => CallError::InvalidCode(code.to_string()),
            (StatusCode::UNAUTHORIZED, _) => CallError::Unauthenticated,
            _ => CallError::AllocationError(message),
        })
    }
}

fn transport_error(e: reqwest::Error) -> CallError {
    CallError::AllocationError(e.to_string())
}

#[async_trait]
impl RoomAllocator for HttpRoomAllocator {
    async fn create_room(&self, creator: &Username) -> Result<RoomCode, CallError> {
        let response = self.post("/api/create-room", creator).await?;
        let body: CreateRoomResponse = Self::parse(response, None).await?;
        Ok(body.room_code)
    }

    async fn join_room(
        &self,
        code: &RoomCode,
        username: &Username,
    ) -> Result<Vec<Username>, CallError> {
        let response = self
            .post(&format!("/api/join-room/{}", code), username)
            .await?;
        let body: JoinRoomResponse = Self::parse(response, Some(code)).await?;
        Ok(body.participants)
    }

    async fn leave_room(&self, code: &RoomCode, username: &Username) -> Result<(), CallError> {
        let response = self
            .post(&format!("/api/leave-room/{}", code), username)
            .await?;
        let _: serde_json::Value = Self::parse(response, Some(code)).await?;
        Ok(())
    }
}
