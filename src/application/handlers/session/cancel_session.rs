//! CancelSessionHandler - Command handler for cancelling sessions.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, EventId, SerializableDomainEvent, SessionId, Timestamp};
use crate::domain::session::{Session, SessionCancelled, SessionError};
use crate::ports::{EventPublisher, SessionRepository};

/// Command to cancel a session.
#[derive(Debug, Clone)]
pub struct CancelSessionCommand {
    pub session_id: SessionId,
}

/// Handler for cancelling sessions.
///
/// Only the creator may cancel, and only while the session is open or
/// full.
pub struct CancelSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelSessionHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, SessionError> {
        let mut session = self
            .repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| SessionError::not_found(cmd.session_id))?;

        session.authorize_creator(&metadata.user_id)?;

        // An elapsed session can no longer be cancelled, even if the
        // sweeper has not caught up yet
        let now = Timestamp::now();
        if session.effective_status(&now).is_terminal() && !session.status().is_terminal() {
            return Err(SessionError::invalid_state(
                "Session has already ended".to_string(),
            ));
        }

        session.cancel()?;
        self.repository.update(&session).await?;

        let event = SessionCancelled {
            event_id: EventId::new(),
            session_id: *session.id(),
            cancelled_by: metadata.user_id.clone(),
            occurred_at: *session.updated_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{Intent, SessionStatus, SkillLevel, SkillRange, UserId};

    async fn seed_session(store: &InMemoryStore) -> Session {
        let session = Session::new(
            SessionId::new(),
            UserId::new("creator-1").unwrap(),
            "Evening doubles".to_string(),
            "Court 3".to_string(),
            Timestamp::now().plus_days(1),
            90,
            Intent::Match,
            SkillRange::new(SkillLevel::Ntrp30, SkillLevel::Ntrp40).unwrap(),
            4,
        )
        .unwrap();
        SessionRepository::save(store, &session).await.unwrap();
        session
    }

    #[tokio::test]
    async fn creator_cancels_open_session() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let session = seed_session(store.as_ref()).await;

        let handler = CancelSessionHandler::new(store.clone(), bus.clone());
        let cancelled = handler
            .handle(
                CancelSessionCommand {
                    session_id: *session.id(),
                },
                CommandMetadata::test_fixture_for("creator-1"),
            )
            .await
            .unwrap();

        assert_eq!(cancelled.status(), SessionStatus::Cancelled);
        assert!(bus.has_event("session.cancelled.v1"));
    }

    #[tokio::test]
    async fn non_creator_cannot_cancel() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let session = seed_session(store.as_ref()).await;

        let handler = CancelSessionHandler::new(store.clone(), bus.clone());
        let result = handler
            .handle(
                CancelSessionCommand {
                    session_id: *session.id(),
                },
                CommandMetadata::test_fixture_for("intruder"),
            )
            .await;

        assert!(matches!(result, Err(SessionError::Forbidden)));
        assert_eq!(bus.event_count(), 0);

        let stored = SessionRepository::find_by_id(store.as_ref(), session.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), SessionStatus::Open);
    }

    #[tokio::test]
    async fn missing_session_reports_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CancelSessionHandler::new(store, bus);

        let result = handler
            .handle(
                CancelSessionCommand {
                    session_id: SessionId::new(),
                },
                CommandMetadata::test_fixture_for("creator-1"),
            )
            .await;

        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn cancelling_twice_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let session = seed_session(store.as_ref()).await;

        let handler = CancelSessionHandler::new(store.clone(), bus.clone());
        let cmd = CancelSessionCommand {
            session_id: *session.id(),
        };
        let metadata = CommandMetadata::test_fixture_for("creator-1");

        handler.handle(cmd.clone(), metadata.clone()).await.unwrap();
        let result = handler.handle(cmd, metadata).await;

        assert!(matches!(result, Err(SessionError::InvalidState(_))));
        assert_eq!(bus.events_of_type("session.cancelled.v1").len(), 1);
    }
}
