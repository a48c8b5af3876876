//! Session repository port (write side).
//!
//! Defines the contract for persisting and retrieving Session aggregates.
//! Slot-count changes go through `MatchRequestRepository`, which commits
//! them together with the request transition.

use crate::domain::foundation::{DomainError, SessionId, Timestamp, UserId};
use crate::domain::session::Session;
use async_trait::async_trait;

/// Repository port for Session aggregate persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Update an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Find all sessions created by a user, newest start time first.
    async fn find_by_creator(&self, creator_id: &UserId) -> Result<Vec<Session>, DomainError>;

    /// Transition every non-terminal session whose scheduled end is at or
    /// before `now` to Completed.
    ///
    /// Returns the sessions that were transitioned so the caller can
    /// publish their completion events. Used by the periodic sweeper.
    async fn complete_elapsed(&self, now: &Timestamp) -> Result<Vec<Session>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
