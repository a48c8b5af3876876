//! HTTP DTOs for match request endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::session::RequestResponse;
use crate::application::handlers::match_request::{DecisionOutcome, WithdrawOutcome};
use crate::domain::foundation::SessionId;

/// Body for submitting a join request.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequestBody {
    pub session_id: SessionId,
    /// Optional note to the session creator.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response for an accept decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionResponse {
    #[serde(flatten)]
    pub request: RequestResponse,
    pub session_became_full: bool,
}

impl From<&DecisionOutcome> for DecisionResponse {
    fn from(outcome: &DecisionOutcome) -> Self {
        Self {
            request: RequestResponse::from(&outcome.request),
            session_became_full: outcome.session_became_full,
        }
    }
}

/// Response for a withdrawal.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawResponse {
    #[serde(flatten)]
    pub request: RequestResponse,
    pub session_reopened: bool,
}

impl From<&WithdrawOutcome> for WithdrawResponse {
    fn from(outcome: &WithdrawOutcome) -> Self {
        Self {
            request: RequestResponse::from(&outcome.request),
            session_reopened: outcome.session_reopened,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_body_deserializes_session_id() {
        let id = SessionId::new();
        let json = format!(r#"{{"session_id":"{}"}}"#, id);

        let body: SubmitRequestBody = serde_json::from_str(&json).unwrap();
        assert_eq!(body.session_id, id);
        assert_eq!(body.message, None);
    }

    #[test]
    fn submit_body_carries_optional_message() {
        let id = SessionId::new();
        let json = format!(r#"{{"session_id":"{}","message":"First time here"}}"#, id);

        let body: SubmitRequestBody = serde_json::from_str(&json).unwrap();
        assert_eq!(body.message.as_deref(), Some("First time here"));
    }
}
