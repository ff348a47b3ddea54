use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use huddle_core::CallError;
use huddle_core::model::api::ErrorResponse;

/// A [`CallError`] on its way out of an HTTP handler.
#[derive(Debug)]
pub struct ApiError(pub CallError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CallError::InvalidCode(_) => StatusCode::BAD_REQUEST,
            CallError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            CallError::RoomFull(_) => StatusCode::CONFLICT,
            CallError::Unauthenticated => StatusCode::UNAUTHORIZED,
            CallError::AllocationError(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CallError> for ApiError {
    fn from(e: CallError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
