use crate::api::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use huddle_core::model::api::IDENTITY_HEADER;
use huddle_core::{CallError, Username};

/// The caller, as named by the `x-username` header.
///
/// Requests without a non-blank header are rejected with `401`.
#[derive(Debug, Clone)]
pub struct Identity(pub Username);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ApiError(CallError::Unauthenticated))?;

        Ok(Self(Username::from(username)))
    }
}
