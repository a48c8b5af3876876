//! Match request repository port.
//!
//! Besides plain persistence, this port owns the two operations that move
//! a session's slot count: accepting a request and withdrawing an accepted
//! one. Implementations must commit the request transition and the slot
//! change as a single atomic step so concurrent accepts can never
//! oversubscribe a session.

use crate::domain::foundation::{DomainError, RequestId, SessionId, UserId};
use crate::domain::match_request::MatchRequest;
use async_trait::async_trait;

/// Repository port for MatchRequest persistence and slot accounting.
#[async_trait]
pub trait MatchRequestRepository: Send + Sync {
    /// Save a new pending request.
    ///
    /// # Errors
    ///
    /// - `DuplicateRequest` if the requester already has an active
    ///   (pending or accepted) request for the session
    /// - `DatabaseError` on persistence failure
    async fn save(&self, request: &MatchRequest) -> Result<(), DomainError>;

    /// Update an existing request.
    ///
    /// Used for transitions that do not touch slot counts (decline,
    /// withdrawal of a still-pending request).
    ///
    /// # Errors
    ///
    /// - `RequestNotFound` if request doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, request: &MatchRequest) -> Result<(), DomainError>;

    /// Find a request by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &RequestId) -> Result<Option<MatchRequest>, DomainError>;

    /// Find all requests targeting a session, oldest first.
    async fn find_by_session(&self, session_id: &SessionId)
        -> Result<Vec<MatchRequest>, DomainError>;

    /// Check whether the user has an active (pending or accepted) request
    /// for the session.
    async fn has_active(
        &self,
        session_id: &SessionId,
        requester_id: &UserId,
    ) -> Result<bool, DomainError>;

    /// Atomically accept a pending request and claim one session slot.
    ///
    /// Returns true if the claim filled the session. The slot claim is
    /// guarded against the live session row, not the caller's snapshot,
    /// so exactly one of any set of concurrent accepts for the last slot
    /// succeeds.
    ///
    /// # Errors
    ///
    /// - `RequestNotFound` if the request doesn't exist
    /// - `InvalidStateTransition` if the request is no longer pending
    /// - `CapacityExceeded` if every slot is already claimed
    /// - `SessionClosed` if the session is completed or cancelled
    /// - `DatabaseError` on persistence failure
    async fn accept_claiming_slot(
        &self,
        request_id: &RequestId,
        session_id: &SessionId,
    ) -> Result<bool, DomainError>;

    /// Atomically withdraw an accepted request and release its slot.
    ///
    /// Returns true if releasing the slot reopened a full session.
    ///
    /// # Errors
    ///
    /// - `RequestNotFound` if the request doesn't exist
    /// - `InvalidStateTransition` if the request is not accepted
    /// - `SessionClosed` if the session is completed or cancelled
    /// - `DatabaseError` on persistence failure
    async fn withdraw_releasing_slot(
        &self,
        request_id: &RequestId,
        session_id: &SessionId,
    ) -> Result<bool, DomainError>;
}
