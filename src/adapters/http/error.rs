//! Error payloads and status mapping shared by the HTTP handlers.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;

use crate::domain::foundation::ErrorCode;
use crate::domain::match_request::MatchRequestError;
use crate::domain::session::SessionError;

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }
}

/// Map an error code to the HTTP status it should surface as.
fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::SessionNotFound | ErrorCode::RequestNotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::ValidationFailed
        | ErrorCode::EmptyField
        | ErrorCode::OutOfRange
        | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidStateTransition
        | ErrorCode::SessionClosed
        | ErrorCode::DuplicateRequest
        | ErrorCode::SelfJoin
        | ErrorCode::CapacityExceeded => StatusCode::CONFLICT,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(super) fn session_error_response(error: SessionError) -> Response {
    let code = error.code();
    let status = status_for(code);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(code = %code, "Session operation failed: {}", error.message());
    }
    (status, Json(ErrorResponse::new(code, error.message()))).into_response()
}

pub(super) fn request_error_response(error: MatchRequestError) -> Response {
    let code = error.code();
    let status = status_for(code);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(code = %code, "Request operation failed: {}", error.message());
    }
    (status, Json(ErrorResponse::new(code, error.message()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{RequestId, SessionId};

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(status_for(ErrorCode::SessionNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::RequestNotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn workflow_conflicts_map_to_409() {
        for code in [
            ErrorCode::InvalidStateTransition,
            ErrorCode::SessionClosed,
            ErrorCode::DuplicateRequest,
            ErrorCode::SelfJoin,
            ErrorCode::CapacityExceeded,
        ] {
            assert_eq!(status_for(code), StatusCode::CONFLICT, "code {}", code);
        }
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(status_for(ErrorCode::ValidationFailed), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_response_carries_screaming_snake_code() {
        let response = ErrorResponse::new(
            ErrorCode::CapacityExceeded,
            SessionError::not_found(SessionId::new()).message(),
        );
        assert_eq!(response.code, "CAPACITY_EXCEEDED");
    }

    #[test]
    fn request_error_keeps_its_code() {
        let error = MatchRequestError::not_found(RequestId::new());
        assert_eq!(error.code(), ErrorCode::RequestNotFound);
    }
}
