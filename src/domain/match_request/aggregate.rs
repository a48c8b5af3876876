//! MatchRequest aggregate entity.

use crate::domain::foundation::{
    DomainError, ErrorCode, RequestId, RequestStatus, SessionId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// Maximum length for the optional note to the creator.
pub const MAX_MESSAGE_LENGTH: usize = 500;

/// A player's request to join a session.
///
/// # Invariants
///
/// - `requester_id` is never the session creator (enforced at submission)
/// - a user has at most one active (pending or accepted) request per
///   session (enforced by the store)
/// - status transitions follow `RequestStatus::can_transition_to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Unique identifier for this request.
    id: RequestId,

    /// Session the requester wants to join.
    session_id: SessionId,

    /// Player asking to join.
    requester_id: UserId,

    /// Workflow status.
    status: RequestStatus,

    /// Optional note from the requester to the creator.
    message: Option<String>,

    /// When the request was submitted.
    created_at: Timestamp,

    /// When the request was last updated.
    updated_at: Timestamp,
}

impl MatchRequest {
    /// Create a new pending request.
    ///
    /// A blank message is stored as no message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the message exceeds 500 characters
    pub fn new(
        id: RequestId,
        session_id: SessionId,
        requester_id: UserId,
        message: Option<String>,
    ) -> Result<Self, DomainError> {
        let message = match message {
            Some(text) if text.trim().is_empty() => None,
            Some(text) if text.chars().count() > MAX_MESSAGE_LENGTH => {
                return Err(DomainError::validation(
                    "message",
                    format!("Message exceeds {} characters", MAX_MESSAGE_LENGTH),
                ))
            }
            other => other,
        };

        let now = Timestamp::now();
        Ok(Self {
            id,
            session_id,
            requester_id,
            status: RequestStatus::Pending,
            message,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a request from persistence (no validation, no events).
    pub fn reconstitute(
        id: RequestId,
        session_id: SessionId,
        requester_id: UserId,
        status: RequestStatus,
        message: Option<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            requester_id,
            status,
            message,
            created_at,
            updated_at,
        }
    }

    /// Returns the request ID.
    pub fn id(&self) -> &RequestId {
        &self.id
    }

    /// Returns the target session ID.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns the requesting player's ID.
    pub fn requester_id(&self) -> &UserId {
        &self.requester_id
    }

    /// Returns the workflow status.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns the requester's note, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns when the request was submitted.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the request was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns true while the request is pending or accepted.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Checks if the given user submitted this request.
    pub fn is_requester(&self, user_id: &UserId) -> bool {
        &self.requester_id == user_id
    }

    /// Accept the request (creator decision).
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the request is not pending
    pub fn accept(&mut self) -> Result<(), DomainError> {
        self.transition_to(RequestStatus::Accepted)
    }

    /// Decline the request (creator decision).
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the request is not pending
    pub fn decline(&mut self) -> Result<(), DomainError> {
        self.transition_to(RequestStatus::Declined)
    }

    /// Withdraw the request (requester decision).
    ///
    /// Allowed while pending or accepted; withdrawing an accepted request
    /// releases its slot.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the request is already settled
    pub fn withdraw(&mut self) -> Result<(), DomainError> {
        self.transition_to(RequestStatus::Withdrawn)
    }

    fn transition_to(&mut self, target: RequestStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot move a {} request to {}", self.status, target),
            ));
        }
        self.status = target;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
