//! Caller identity extraction.
//!
//! The core trusts an upstream gateway to authenticate callers and pass
//! the resulting identity in the `x-user-id` header. The extractor only
//! checks that the header is present and non-empty; it never inspects
//! the value.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::UserId;

use super::error::ErrorResponse;

/// Header carrying the pre-authenticated caller identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated caller.
///
/// Rejects with 401 when the header is missing or empty.
#[derive(Debug, Clone)]
pub struct Identity(pub UserId);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        match UserId::new(header) {
            Ok(user_id) => Ok(Identity(user_id)),
            Err(_) => Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::unauthorized(format!(
                    "Missing or empty {} header",
                    USER_ID_HEADER
                ))),
            )
                .into_response()),
        }
    }
}
