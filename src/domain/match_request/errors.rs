//! Match-request-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, RequestId, SessionId};

/// Errors from the match-request workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRequestError {
    /// Request was not found.
    NotFound(RequestId),
    /// Target session was not found.
    SessionNotFound(SessionId),
    /// User may not act on this request.
    Forbidden,
    /// Request is not in a state that allows the operation.
    InvalidState(String),
    /// Session no longer accepts requests or decisions.
    SessionClosed(String),
    /// User already has an active request for this session.
    Duplicate,
    /// Creator tried to request their own session.
    SelfJoin,
    /// Every slot is already claimed.
    CapacityExceeded,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl MatchRequestError {
    pub fn not_found(id: RequestId) -> Self {
        MatchRequestError::NotFound(id)
    }
    pub fn session_not_found(id: SessionId) -> Self {
        MatchRequestError::SessionNotFound(id)
    }
    pub fn forbidden() -> Self {
        MatchRequestError::Forbidden
    }
    pub fn invalid_state(message: impl Into<String>) -> Self {
        MatchRequestError::InvalidState(message.into())
    }
    pub fn session_closed(message: impl Into<String>) -> Self {
        MatchRequestError::SessionClosed(message.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MatchRequestError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        MatchRequestError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            MatchRequestError::NotFound(_) => ErrorCode::RequestNotFound,
            MatchRequestError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            MatchRequestError::Forbidden => ErrorCode::Forbidden,
            MatchRequestError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            MatchRequestError::SessionClosed(_) => ErrorCode::SessionClosed,
            MatchRequestError::Duplicate => ErrorCode::DuplicateRequest,
            MatchRequestError::SelfJoin => ErrorCode::SelfJoin,
            MatchRequestError::CapacityExceeded => ErrorCode::CapacityExceeded,
            MatchRequestError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MatchRequestError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            MatchRequestError::NotFound(id) => format!("Match request not found: {}", id),
            MatchRequestError::SessionNotFound(id) => format!("Session not found: {}", id),
            MatchRequestError::Forbidden => "Permission denied".to_string(),
            MatchRequestError::InvalidState(msg) => format!("Invalid state: {}", msg),
            MatchRequestError::SessionClosed(msg) => msg.clone(),
            MatchRequestError::Duplicate => {
                "An active request for this session already exists".to_string()
            }
            MatchRequestError::SelfJoin => {
                "The session creator cannot request to join their own session".to_string()
            }
            MatchRequestError::CapacityExceeded => {
                "Session has no remaining player slots".to_string()
            }
            MatchRequestError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MatchRequestError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for MatchRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MatchRequestError {}

impl From<DomainError> for MatchRequestError {
    fn from(err: DomainError) -> Self {
        match err.code {
            // Not-found codes keep their identity so the HTTP layer maps
            // them to 404 rather than 500
            ErrorCode::RequestNotFound => {
                match err.details.get("request_id").and_then(|v| v.parse().ok()) {
                    Some(id) => MatchRequestError::NotFound(id),
                    None => MatchRequestError::Infrastructure(err.message),
                }
            }
            ErrorCode::SessionNotFound => {
                match err.details.get("session_id").and_then(|v| v.parse().ok()) {
                    Some(id) => MatchRequestError::SessionNotFound(id),
                    None => MatchRequestError::Infrastructure(err.message),
                }
            }
            ErrorCode::Forbidden => MatchRequestError::Forbidden,
            ErrorCode::SessionClosed => MatchRequestError::SessionClosed(err.message),
            ErrorCode::CapacityExceeded => MatchRequestError::CapacityExceeded,
            ErrorCode::DuplicateRequest => MatchRequestError::Duplicate,
            ErrorCode::SelfJoin => MatchRequestError::SelfJoin,
            ErrorCode::InvalidStateTransition => MatchRequestError::InvalidState(err.message),
            ErrorCode::ValidationFailed => {
                let field = err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                MatchRequestError::ValidationFailed {
                    field,
                    message: err.message,
                }
            }
            _ => MatchRequestError::Infrastructure(err.message),
        }
    }
}
